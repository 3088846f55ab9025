use crossterm::style::Color;
use crossterm::style::Stylize;
use scratchbot_core::classifier::DEFAULT_STYLE;
use scratchbot_core::markdown;
use scratchbot_core::markdown::Segment;
use scratchbot_core::Category;
use scratchbot_core::Role;
use scratchbot_core::Session;
use scratchbot_core::StyleRecord;
use scratchbot_core::Turn;
use scratchbot_core::{classify_styled, looks_like_block};

use crate::domain::models::Banner;

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;

fn color(hex: &str) -> Color {
    return match StyleRecord::rgb(hex) {
        Some((r, g, b)) => Color::Rgb { r, g, b },
        None => Color::Reset,
    };
}

/// Turns chat content into terminal text. With `color` off the output is
/// plain, which is what pipes and `--task` get.
#[derive(Clone, Copy, Debug)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Renderer {
        return Renderer { color };
    }

    pub fn render_session(&self, session: &Session) -> String {
        let mut out = vec![self.rule(&session.title)];
        for turn in &session.turns {
            out.push(self.render_turn(turn));
        }

        return out.join("\n\n");
    }

    pub fn render_turn(&self, turn: &Turn) -> String {
        let header = match turn.role {
            Role::User => self.paint("You", |s| s.bold().cyan().to_string()),
            Role::Assistant => self.paint("Scratchbot", |s| s.bold().magenta().to_string()),
        };

        return format!("{header}\n{}", self.render_markdown(&turn.text));
    }

    pub fn render_markdown(&self, text: &str) -> String {
        let mut lines: Vec<String> = vec![];
        for segment in markdown::parse(text) {
            match segment {
                Segment::Blank => lines.push(String::new()),
                Segment::Heading { text, .. } => {
                    lines.push(self.paint(&text, |s| s.bold().underlined().to_string()));
                }
                Segment::Bullet { indent, text } => {
                    lines.push(format!("{}• {}", "  ".repeat(indent), self.inline(&text)));
                }
                Segment::Numbered { marker, text } => {
                    lines.push(format!("{marker} {}", self.inline(&text)));
                }
                Segment::Text(text) => {
                    if looks_like_block(&text) {
                        lines.push(self.block_line(&text));
                    } else {
                        lines.push(self.inline(&text));
                    }
                }
                Segment::Code { lines: code, .. } => {
                    for line in code {
                        if line.trim().is_empty() {
                            lines.push(String::new());
                            continue;
                        }
                        lines.push(self.block_line(&line));
                    }
                }
            }
        }

        return lines.join("\n");
    }

    /// One line of Scratch code, painted in its block category's colors.
    pub fn block_line(&self, line: &str) -> String {
        let trimmed = line.trim();
        let indent = &line[..line.len() - line.trim_start().len()];
        let (category, style) = classify_styled(trimmed);

        if !self.color {
            return format!("{indent}{trimmed}");
        }

        if category == Category::None {
            return format!("{indent}{}", trimmed.with(color(DEFAULT_STYLE.text)));
        }

        return format!(
            "{indent}{}{}",
            "▌".with(color(style.border)).on(color(style.background)),
            format!(" {trimmed} ")
                .with(color(style.text))
                .on(color(style.background))
        );
    }

    /// `classify` subcommand output: category, background color, line.
    pub fn render_classification(&self, line: &str) -> String {
        let (category, style) = classify_styled(line);
        let label = format!("{:<10}", category.to_string());
        let swatch = format!("{:<8}", style.background);

        if !self.color {
            return format!("{label} {swatch} {line}");
        }

        return format!(
            "{} {} {}",
            label.bold(),
            swatch.with(color(style.text)).on(color(style.background)),
            line
        );
    }

    pub fn render_banner(&self, banner: &Banner) -> String {
        if banner.is_persistent() {
            return self.paint(&format!("⚠ {}", banner.text), |s| s.bold().red().to_string());
        }

        return self.paint(&format!("! {}", banner.text), |s| s.yellow().to_string());
    }

    pub fn render_suggestions(&self, suggestions: &[&str]) -> String {
        let mut lines = vec![self.paint("Try asking:", |s| s.dim().to_string())];
        for (i, suggestion) in suggestions.iter().enumerate() {
            lines.push(format!("  {}. {suggestion}", i + 1));
        }
        lines.push(self.paint("(type /suggest, then a number)", |s| s.dim().to_string()));

        return lines.join("\n");
    }

    pub fn render_notice(&self, text: &str) -> String {
        return self.paint(text, |s| s.dim().to_string());
    }

    fn inline(&self, text: &str) -> String {
        return markdown::split_bold(text)
            .into_iter()
            .map(|(bold, part)| {
                if bold {
                    self.paint(part, |s| s.bold().to_string())
                } else {
                    part.to_string()
                }
            })
            .collect();
    }

    fn rule(&self, title: &str) -> String {
        return self.paint(&format!("── {title} ──"), |s| s.bold().to_string());
    }

    fn paint(&self, text: &str, styler: impl Fn(&str) -> String) -> String {
        if !self.color {
            return text.to_string();
        }

        return styler(text);
    }
}
