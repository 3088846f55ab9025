//! Core domain logic for the terminal chat.
//!
//! Sessions, pending requests and slash commands are handled here, independent
//! of how lines are read or how the model is reached.

pub mod models;
pub mod services;
