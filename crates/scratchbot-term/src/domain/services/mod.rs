pub mod actions;
pub mod app_state;
pub mod events;
pub mod renderer;

pub use actions::*;
pub use app_state::*;
pub use events::*;
pub use renderer::*;
