//! Configuration for the Scratch helper.
//!
//! Configuration comes from an optional YAML file. The API key can instead
//! come from the environment, and command-line flags are applied on top by
//! the binary.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
