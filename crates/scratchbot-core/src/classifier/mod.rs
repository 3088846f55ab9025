//! Heuristic Scratch block classifier.
//!
//! Assistant replies contain Scratch scripts written as text, for example
//! `[move (10) steps]` or `if <touching (mouse-pointer)?> then`. The classifier
//! guesses which block palette each line comes from so the front end can color
//! it. The result is cosmetic: a wrong guess only changes a color, and nothing
//! sent to the model depends on it.

mod category;
mod rules;
mod style;

pub use category::Category;
pub use rules::{first_match, Line, Rule, RULES};
pub use style::{style_for, StyleRecord, DEFAULT_STYLE};

/// Best-guess category for one line. Never fails; unmatched lines are
/// [`Category::None`].
pub fn classify(line: &str) -> Category {
    match first_match(line) {
        Some(rule) => {
            log::trace!("classified {:?} as {} via {}", line, rule.category, rule.name);
            rule.category
        }
        None => Category::None,
    }
}

pub fn classify_styled(line: &str) -> (Category, &'static StyleRecord) {
    let category = classify(line);
    (category, style_for(category))
}

/// Whether prose text outside a code fence is written in block notation,
/// e.g. `[say [Hi!] for (2) seconds]` or `<touching (edge)?>`.
pub fn looks_like_block(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.len() < 3 {
        return false;
    }
    (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || (trimmed.starts_with('<') && trimmed.ends_with('>'))
        || (trimmed.starts_with("((") && trimmed.ends_with("))"))
}
