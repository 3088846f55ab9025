//! Infrastructure layer providing external integrations.
//!
//! Adapters from the core language model client to the terminal's
//! `ChatClient` interface live here.

pub mod clients;
