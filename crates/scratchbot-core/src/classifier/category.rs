use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Scratch block palette a line of code-like text is guessed to belong to.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Motion,
    Looks,
    Sound,
    Events,
    Control,
    Sensing,
    Operators,
    Variables,
    Extensions,
    #[default]
    None,
}
