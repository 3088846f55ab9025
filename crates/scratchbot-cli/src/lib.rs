//! Command-line entry point for the Scratch programming helper.
//!
//! One binary covers the interactive chat, one-shot questions, the line
//! classifier and history housekeeping.

pub mod history_commands;
pub mod interactive;
pub mod settings;
