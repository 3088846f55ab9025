//! Ordered block-category rules.
//!
//! The first rule that matches decides the category, and several rules share
//! vocabulary, so the order of [`RULES`] matters. For example, the bounce rule
//! runs before the control rule so that "if on edge, bounce" stays motion.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Category;

/// The three views of a line the rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Lowercased and trimmed.
    pub lower: String,
    /// `lower` with `()[]<>` and digits removed and whitespace collapsed.
    pub clean: String,
    /// `clean` cut into alphanumeric words, space separated and space padded,
    /// so `has(" go to ")` style phrase checks respect word boundaries.
    words: String,
}

impl Line {
    pub fn new(text: &str) -> Self {
        let lower = text.trim().to_lowercase();

        let stripped: String = lower
            .chars()
            .filter(|c| !matches!(c, '(' | ')' | '[' | ']' | '<' | '>') && !c.is_ascii_digit())
            .collect();
        let clean = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

        let tokens: String = clean
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        let words = format!(" {} ", tokens.split_whitespace().collect::<Vec<_>>().join(" "));

        Self { lower, clean, words }
    }

    /// Whole-word phrase check against the clean form.
    fn has(&self, phrase: &str) -> bool {
        self.words.contains(&format!(" {phrase} "))
    }

    fn has_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.has(p))
    }

    fn matches(&self, re: &Regex) -> bool {
        re.is_match(&self.words)
    }
}

static MOVE_STEPS: Lazy<Regex> = Lazy::new(|| Regex::new(r" move .*\bsteps? ").unwrap());
static TURN_DEGREES: Lazy<Regex> = Lazy::new(|| Regex::new(r" turn .*\bdegrees? ").unwrap());
static CHANGE_XY: Lazy<Regex> = Lazy::new(|| Regex::new(r" change [xy] by ").unwrap());
static SET_XY: Lazy<Regex> = Lazy::new(|| Regex::new(r" set [xy] to ").unwrap());
static LEADING_SET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ set (.+?) to ").unwrap());
static SET_TO: Lazy<Regex> = Lazy::new(|| Regex::new(r" set .*\bto ").unwrap());
static CHANGE_BY: Lazy<Regex> = Lazy::new(|| Regex::new(r" change .*\bby ").unwrap());
static STOP_SOUND: Lazy<Regex> = Lazy::new(|| Regex::new(r" stop .*\bsounds? ").unwrap());
static KEY_PRESSED: Lazy<Regex> = Lazy::new(|| Regex::new(r" key .*\bpressed ").unwrap());
static ARITHMETIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s[-+*/<>=]\s").unwrap());
static ADD_TO: Lazy<Regex> = Lazy::new(|| Regex::new(r" add .*\bto ").unwrap());
static DELETE_OF: Lazy<Regex> = Lazy::new(|| Regex::new(r" delete .*\bof ").unwrap());
static INSERT_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r" insert .*\bat ").unwrap());
static ITEM_OF: Lazy<Regex> = Lazy::new(|| Regex::new(r" item .*\bof ").unwrap());

/// Assignment targets that name a block property rather than a variable.
/// A target must equal one of these to be excluded.
const PROPERTY_SET_TARGETS: &[&str] = &[
    "x",
    "y",
    "go",
    "size",
    "rotation style",
    "drag mode",
    "pen color",
    "pen size",
    "pen hue",
    "pen shade",
    "pen saturation",
    "pen brightness",
    "pen transparency",
    "instrument",
    "tempo",
    "voice",
    "language",
    "video transparency",
];

/// Words that mark an effect or volume block wherever they appear in the target.
const PROPERTY_SET_WORDS: &[&str] = &["effect", "volume"];

fn motion_bounce(line: &Line) -> bool {
    line.lower.contains("bounce") && !line.lower.contains("when")
}

fn variable_assignment(line: &Line) -> bool {
    let Some(caps) = LEADING_SET.captures(&line.words) else {
        return false;
    };
    let target = caps[1].trim();
    if PROPERTY_SET_TARGETS.contains(&target) {
        return false;
    }
    !target
        .split(' ')
        .any(|word| PROPERTY_SET_WORDS.contains(&word))
}

fn events(line: &Line) -> bool {
    if line.has("broadcast") {
        return true;
    }
    line.has("when")
        && line.has_any(&["clicked", "pressed", "receive", "switches", "loudness", "timer"])
}

fn looks_layering(line: &Line) -> bool {
    line.has_any(&["go to front", "go to back", "layer", "layers"])
}

fn motion(line: &Line) -> bool {
    line.matches(&MOVE_STEPS)
        || line.matches(&TURN_DEGREES)
        || line.matches(&CHANGE_XY)
        || line.matches(&SET_XY)
        || line.has_any(&[
            "go to",
            "glide",
            "point",
            "x position",
            "y position",
            "direction",
            "rotation style",
        ])
}

fn extensions(line: &Line) -> bool {
    line.has_any(&[
        "pen",
        "stamp",
        "erase all",
        "drum",
        "play note",
        "instrument",
        "tempo",
        "rest for",
        "video",
        "speak",
        "voice",
        "translate",
        "text to speech",
    ])
}

fn control(line: &Line) -> bool {
    line.has_any(&["forever", "repeat", "repeat until", "if", "else", "clone"])
        // "ask [...] and wait" is sensing
        || (line.has("wait") && !line.has("ask"))
        || (line.has("stop") && !line.lower.contains("sound"))
        || line.clean == "end"
}

fn sound(line: &Line) -> bool {
    line.matches(&STOP_SOUND)
        || line.has_any(&[
            "play sound",
            "start sound",
            "volume",
            "pitch",
            "pan left right",
            "sound effects",
        ])
}

fn looks(line: &Line) -> bool {
    let data_monitor = line.has_any(&["variable", "list"]);
    line.has_any(&[
        "say",
        "think",
        "costume",
        "backdrop",
        "size",
        "effect",
        "graphic effects",
    ]) || (line.has_any(&["show", "hide"]) && !data_monitor)
}

fn sensing(line: &Line) -> bool {
    line.matches(&KEY_PRESSED)
        || line.has_any(&[
            "touching",
            "distance",
            "ask",
            "answer",
            "mouse",
            "loudness",
            "timer",
            "days since",
            "username",
            "current",
            "drag mode",
        ])
}

fn operators(line: &Line) -> bool {
    if line.matches(&CHANGE_BY) || line.matches(&SET_TO) {
        return false;
    }
    ARITHMETIC.is_match(&line.lower)
        || line.has_any(&[
            "and", "or", "not", "join", "letter", "length", "contains", "random", "round", "mod",
            "abs", "sqrt",
        ])
}

fn variables(line: &Line) -> bool {
    line.matches(&SET_TO)
        || line.matches(&CHANGE_BY)
        || line.matches(&ADD_TO)
        || line.matches(&DELETE_OF)
        || line.matches(&INSERT_AT)
        || line.matches(&ITEM_OF)
        || line.has_any(&["variable", "replace item", "contents of", "list"])
}

pub struct Rule {
    pub name: &'static str,
    pub category: Category,
    pub matches: fn(&Line) -> bool,
}

pub static RULES: &[Rule] = &[
    Rule { name: "motion-bounce", category: Category::Motion, matches: motion_bounce },
    Rule { name: "variable-assignment", category: Category::Variables, matches: variable_assignment },
    Rule { name: "events", category: Category::Events, matches: events },
    Rule { name: "looks-layering", category: Category::Looks, matches: looks_layering },
    Rule { name: "motion", category: Category::Motion, matches: motion },
    Rule { name: "extensions", category: Category::Extensions, matches: extensions },
    Rule { name: "control", category: Category::Control, matches: control },
    Rule { name: "sound", category: Category::Sound, matches: sound },
    Rule { name: "looks", category: Category::Looks, matches: looks },
    Rule { name: "sensing", category: Category::Sensing, matches: sensing },
    Rule { name: "operators", category: Category::Operators, matches: operators },
    Rule { name: "variables", category: Category::Variables, matches: variables },
];

/// First matching rule for `text`, if any.
pub fn first_match(text: &str) -> Option<&'static Rule> {
    let line = Line::new(text);
    RULES.iter().find(|rule| (rule.matches)(&line))
}
