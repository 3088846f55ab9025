//! Terminal front end for the Scratch programming helper.
//!
//! A line-oriented chat that keeps several sessions, sends questions in the
//! background and paints Scratch code in block category colors. Requests for
//! different sessions run concurrently; each session waits for its own answer.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub use application::repl::start_loop;
pub use domain::models::{Action, ChatClient, ChatClientBox, ChatPrompt, Event};
pub use domain::services::{ActionsService, AppStateProps, Renderer};
pub use infrastructure::clients::LanguageModelChatClient;
