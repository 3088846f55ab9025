//! Line-level markdown segmentation for assistant replies.
//!
//! Only the constructs the model actually produces are recognised: headings,
//! bullet items, fenced code and plain prose. Inline emphasis is left to the
//! renderer.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Blank,
    Heading { level: usize, text: String },
    Bullet { indent: usize, text: String },
    Numbered { marker: String, text: String },
    Text(String),
    Code { language: Option<String>, lines: Vec<String> },
}

pub fn parse(text: &str) -> Vec<Segment> {
    let mut segments = vec![];
    let mut code: Option<(Option<String>, Vec<String>)> = None;

    for raw in text.replace('\t', "  ").split('\n') {
        let line = raw.trim_end_matches('\r');
        let trimmed = line.trim();

        if let Some(info) = trimmed.strip_prefix("```") {
            match code.take() {
                Some((language, lines)) => segments.push(Segment::Code { language, lines }),
                None => {
                    let language = info.trim();
                    let language = (!language.is_empty()).then(|| language.to_string());
                    code = Some((language, vec![]));
                }
            }
            continue;
        }

        if let Some((_, lines)) = code.as_mut() {
            lines.push(line.to_string());
            continue;
        }

        segments.push(parse_line(line));
    }

    // A reply cut off mid-fence still renders its code.
    if let Some((language, lines)) = code {
        segments.push(Segment::Code { language, lines });
    }

    segments
}

fn parse_line(line: &str) -> Segment {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Segment::Blank;
    }

    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
        return Segment::Heading {
            level: hashes,
            text: trimmed[hashes..].trim().to_string(),
        };
    }

    let indent = line.len() - line.trim_start().len();
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Segment::Bullet {
                indent: indent / 2,
                text: rest.trim().to_string(),
            };
        }
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 && trimmed[digits..].starts_with(". ") {
        return Segment::Numbered {
            marker: trimmed[..digits + 1].to_string(),
            text: trimmed[digits + 2..].trim().to_string(),
        };
    }

    Segment::Text(trimmed.to_string())
}

/// Splits `**bold**` spans; odd-indexed parts are bold.
pub fn split_bold(text: &str) -> Vec<(bool, &str)> {
    let parts: Vec<&str> = text.split("**").collect();
    // An unbalanced marker is literal text.
    if parts.len() % 2 == 0 {
        return vec![(false, text)];
    }
    parts
        .into_iter()
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, part)| (i % 2 == 1, part))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_reply() {
        let reply = "## Making a sprite move\n\nTry this:\n```scratch\nwhen green flag clicked\nmove (10) steps\n```\n- Press the flag\n1. Then watch";
        let segments = parse(reply);

        assert_eq!(
            segments,
            vec![
                Segment::Heading { level: 2, text: "Making a sprite move".to_string() },
                Segment::Blank,
                Segment::Text("Try this:".to_string()),
                Segment::Code {
                    language: Some("scratch".to_string()),
                    lines: vec!["when green flag clicked".to_string(), "move (10) steps".to_string()],
                },
                Segment::Bullet { indent: 0, text: "Press the flag".to_string() },
                Segment::Numbered { marker: "1.".to_string(), text: "Then watch".to_string() },
            ]
        );
    }

    #[test]
    fn test_unclosed_fence_keeps_code() {
        let segments = parse("```\nforever\n  turn (15) degrees");
        assert_eq!(
            segments,
            vec![Segment::Code {
                language: None,
                lines: vec!["forever".to_string(), "  turn (15) degrees".to_string()],
            }]
        );
    }

    #[test]
    fn test_hash_without_space_is_text() {
        assert_eq!(parse("#FF0000"), vec![Segment::Text("#FF0000".to_string())]);
    }

    #[test]
    fn test_split_bold() {
        assert_eq!(
            split_bold("use the **forever** block"),
            vec![(false, "use the "), (true, "forever"), (false, " block")]
        );
        assert_eq!(split_bold("2 ** 3 is odd"), vec![(false, "2 ** 3 is odd")]);
    }
}
