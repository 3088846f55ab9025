use serde::Serialize;

use super::Category;

/// Display colors for one category, as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleRecord {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

impl StyleRecord {
    /// Parses one of the hex fields into RGB components.
    pub fn rgb(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

const WHITE: &str = "#FFFFFF";

pub const DEFAULT_STYLE: StyleRecord = StyleRecord {
    background: "#F3F4F6",
    border: "#D1D5DB",
    text: "#1F2937",
};

static STYLES: [(Category, StyleRecord); 9] = [
    (
        Category::Motion,
        StyleRecord { background: "#4C97FF", border: "#3373CC", text: WHITE },
    ),
    (
        Category::Looks,
        StyleRecord { background: "#9966FF", border: "#774DCB", text: WHITE },
    ),
    (
        Category::Sound,
        StyleRecord { background: "#CF63CF", border: "#BD42BD", text: WHITE },
    ),
    (
        Category::Events,
        StyleRecord { background: "#FFBF00", border: "#CC9900", text: WHITE },
    ),
    (
        Category::Control,
        StyleRecord { background: "#FFAB19", border: "#CF8B17", text: WHITE },
    ),
    (
        Category::Sensing,
        StyleRecord { background: "#5CB1D6", border: "#2E8EB8", text: WHITE },
    ),
    (
        Category::Operators,
        StyleRecord { background: "#59C059", border: "#389438", text: WHITE },
    ),
    (
        Category::Variables,
        StyleRecord { background: "#FF8C1A", border: "#DB6E00", text: WHITE },
    ),
    (
        Category::Extensions,
        StyleRecord { background: "#0FBD8C", border: "#0B8E69", text: WHITE },
    ),
];

/// Static lookup; categories without an entry get [`DEFAULT_STYLE`].
pub fn style_for(category: Category) -> &'static StyleRecord {
    STYLES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, style)| style)
        .unwrap_or(&DEFAULT_STYLE)
}
