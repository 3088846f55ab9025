use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core_types::{Role, Turn};
use crate::prompt::WELCOME_MESSAGE;

pub const NEW_SESSION_TITLE: &str = "New chat";
const TITLE_CHARS: usize = 30;
const PREVIEW_CHARS: usize = 50;
pub const MIN_PREFIX_CHARS: usize = 4;
const SHORT_ID_CHARS: usize = 8;

/// One conversation. Turns are append-only and kept in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub last_modified: DateTime<Utc>,
    pub turns: Vec<Turn>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session that opens with the assistant's welcome turn.
    pub fn new() -> Self {
        let welcome = Turn::assistant(WELCOME_MESSAGE);
        Self {
            id: Uuid::new_v4().to_string(),
            title: NEW_SESSION_TITLE.to_string(),
            preview: preview_of(&welcome.text),
            last_modified: welcome.created_at,
            turns: vec![welcome],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        if turn.role == Role::User && !self.has_user_turns() {
            self.title = truncate(turn.text.trim(), TITLE_CHARS);
        }
        self.preview = preview_of(&turn.text);
        self.last_modified = turn.created_at;
        self.turns.push(turn);
    }

    /// The first few characters of the id, as shown in listings.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_CHARS) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }

    pub fn has_user_turns(&self) -> bool {
        self.turns.iter().any(|t| t.role == Role::User)
    }

    /// Turns that make up the conversation context, without the canned
    /// welcome turn at the top of every session.
    pub fn context(&self) -> &[Turn] {
        match self.turns.first() {
            Some(first) if first.role == Role::Assistant && first.text == WELCOME_MESSAGE => {
                &self.turns[1..]
            }
            _ => &self.turns,
        }
    }
}

/// Newest first. Display order only; nothing else depends on it.
pub fn sort_by_last_modified_desc(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}

/// Resolves a user-typed session reference: a 1-based position in the
/// newest-first listing, a full id, or an id prefix of at least
/// `MIN_PREFIX_CHARS` that matches exactly one session.
pub fn find_session<'a>(sessions: &'a [Session], key: &str) -> Option<&'a Session> {
    let key = key.trim();
    let mut sorted: Vec<&Session> = sessions.iter().collect();
    sorted.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

    if let Ok(index) = key.parse::<usize>() {
        if (1..=sorted.len()).contains(&index) {
            return Some(sorted[index - 1]);
        }
    }

    if let Some(session) = sorted.iter().copied().find(|s| s.id == key) {
        return Some(session);
    }

    if key.chars().count() < MIN_PREFIX_CHARS {
        return None;
    }
    let mut matches = sorted.into_iter().filter(|s| s.id.starts_with(key));
    match (matches.next(), matches.next()) {
        (Some(session), None) => Some(session),
        _ => None,
    }
}

fn preview_of(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&collapsed, PREVIEW_CHARS)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_session_starts_with_welcome() {
        let session = Session::new();
        assert_eq!(session.title, NEW_SESSION_TITLE);
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.turns[0].role, Role::Assistant);
        assert!(session.context().is_empty());
        assert!(!session.has_user_turns());
        assert!(Uuid::parse_str(&session.id).is_ok());
    }

    #[test]
    fn test_title_comes_from_first_user_turn() {
        let mut session = Session::new();
        session.push(Turn::user("How do I make my cat sprite jump when I press space?"));
        session.push(Turn::assistant("Use a [when (space) key pressed] hat block."));
        session.push(Turn::user("And glide?"));

        assert_eq!(session.title, "How do I make my cat sprite ju…");
        assert_eq!(session.preview, "And glide?");
        assert_eq!(session.context().len(), 3);
    }

    #[test]
    fn test_preview_collapses_whitespace_and_truncates() {
        let mut session = Session::new();
        session.push(Turn::assistant(
            "Here is a script:\n\n```\nforever\n  move (10) steps\n  if on edge, bounce\nend\n```",
        ));
        assert!(!session.preview.contains('\n'));
        assert!(session.preview.ends_with('…'));
        assert!(session.preview.chars().count() <= PREVIEW_CHARS + 1);
    }

    #[test]
    fn test_push_updates_last_modified() {
        let mut session = Session::new();
        let mut turn = Turn::user("hi");
        turn.created_at = session.last_modified + Duration::seconds(5);
        let expected = turn.created_at;
        session.push(turn);
        assert_eq!(session.last_modified, expected);
    }

    #[test]
    fn test_sort_by_last_modified_desc() {
        let now = Utc::now();
        let mut sessions: Vec<Session> = (0..3)
            .map(|i| {
                let mut s = Session::new();
                s.last_modified = now + Duration::seconds(i);
                s
            })
            .collect();
        let newest = sessions[2].id.clone();

        sort_by_last_modified_desc(&mut sessions);
        assert_eq!(sessions[0].id, newest);
        assert!(sessions.windows(2).all(|w| w[0].last_modified >= w[1].last_modified));
    }

    #[test]
    fn test_find_session_by_position_id_and_prefix() {
        let base = Utc::now();
        let mut sessions = vec![Session::new(), Session::new(), Session::new()];
        for (i, (session, id)) in sessions
            .iter_mut()
            .zip(["abcd1111", "abcd2222", "ffff0000"])
            .enumerate()
        {
            session.id = id.to_string();
            session.last_modified = base + Duration::minutes(i as i64);
        }

        assert_eq!(find_session(&sessions, "1").unwrap().id, "ffff0000");
        assert_eq!(find_session(&sessions, "3").unwrap().id, "abcd1111");
        assert_eq!(find_session(&sessions, "abcd2222").unwrap().id, "abcd2222");
        assert_eq!(find_session(&sessions, "ffff").unwrap().id, "ffff0000");
        assert!(find_session(&sessions, "abcd").is_none());
        assert!(find_session(&sessions, "fff").is_none());
        assert!(find_session(&sessions, "0").is_none());
    }

    #[test]
    fn test_short_id_respects_char_boundaries() {
        let mut session = Session::new();
        assert_eq!(session.short_id().len(), 8);
        assert!(session.id.starts_with(session.short_id()));

        session.id = "aééééééééé".to_string();
        assert_eq!(session.short_id(), "aééééééé");

        session.id = "aéé".to_string();
        assert_eq!(session.short_id(), "aéé");
    }
}
