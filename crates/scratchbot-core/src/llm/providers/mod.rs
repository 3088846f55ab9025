//! Concrete language model providers.

pub mod gemini;
