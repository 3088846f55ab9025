//! Application layer driving the terminal chat.
//!
//! The loop here reads lines, hands them to `AppState`, prints what changed and
//! writes the history file after every change.

pub mod repl;
