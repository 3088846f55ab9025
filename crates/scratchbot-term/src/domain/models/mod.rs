mod action;
mod banner;
mod chat_client;
mod event;
mod slash_commands;

pub use action::*;
pub use banner::*;
pub use chat_client::*;
pub use event::*;
pub use slash_commands::*;
