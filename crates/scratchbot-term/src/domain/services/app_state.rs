use std::collections::HashSet;

use anyhow::bail;
use anyhow::Result;
use scratchbot_core::errors::MISSING_KEY_NOTICE;
use scratchbot_core::history::find_session;
use scratchbot_core::history::sort_by_last_modified_desc;
use scratchbot_core::prompt::SUGGESTED_QUESTIONS;
use scratchbot_core::ChatError;
use scratchbot_core::Session;
use scratchbot_core::SessionStore;
use scratchbot_core::Turn;
use tokio::sync::mpsc;

use super::help_text;
use crate::domain::models::Action;
use crate::domain::models::Banner;
use crate::domain::models::ChatPrompt;
use crate::domain::models::SlashCommand;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

pub const SHOWN_SUGGESTIONS: usize = 4;
pub const BUSY_NOTICE: &str =
    "Still waiting for an answer in this chat. You can keep going in another chat with /new.";

pub fn error_turn_text(error: &ChatError) -> String {
    return format!(
        "Sorry, I encountered an error: {error}\n\nPlease try asking your question again, or contact your instructor if the problem persists."
    );
}

pub struct AppStateProps {
    pub store: SessionStore,
    pub configured: bool,
    pub session_id: Option<String>,
    pub new_session: bool,
}

/// What the loop should do after a line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Quit,
    /// The question went out; wait for the reply.
    Sent,
    /// Print this and read the next line.
    Show(String),
    /// The current session changed; redraw it.
    Switched,
    Ignored,
}

pub struct AppState {
    pub sessions: Vec<Session>,
    pub current_id: String,
    pub banner: Option<Banner>,
    pub configured: bool,
    in_flight: HashSet<String>,
    awaiting_suggestion: bool,
    store: SessionStore,
}

impl AppState {
    pub async fn new(props: AppStateProps) -> Result<AppState> {
        let sessions = props.store.load().await?;
        let mut app_state = AppState::from_sessions(sessions, props.store, props.configured);

        if let Some(session_id) = props.session_id {
            let Some(session) = app_state.find(&session_id) else {
                bail!("No session found for {session_id}");
            };
            app_state.current_id = session.id.clone();
        } else if props.new_session {
            app_state.new_session();
        }

        return Ok(app_state);
    }

    pub fn from_sessions(sessions: Vec<Session>, store: SessionStore, configured: bool) -> AppState {
        let mut app_state = AppState {
            sessions,
            current_id: String::new(),
            banner: None,
            configured,
            in_flight: HashSet::new(),
            awaiting_suggestion: false,
            store,
        };

        match app_state.most_recent_id() {
            Some(id) => app_state.current_id = id,
            None => {
                app_state.new_session();
            }
        }

        if !configured {
            app_state.banner = Some(Banner::persistent(MISSING_KEY_NOTICE));
        }

        return app_state;
    }

    pub fn current(&self) -> &Session {
        return self
            .sessions
            .iter()
            .find(|s| s.id == self.current_id)
            .unwrap_or(&self.sessions[0]);
    }

    fn session_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        return self.sessions.iter_mut().find(|s| s.id == session_id);
    }

    /// Sessions newest first, the order `/open` and `/delete` numbers refer to.
    pub fn sorted_sessions(&self) -> Vec<&Session> {
        let mut sorted: Vec<&Session> = self.sessions.iter().collect();
        sorted.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        return sorted;
    }

    fn most_recent_id(&self) -> Option<String> {
        return self.sorted_sessions().first().map(|s| s.id.clone());
    }

    /// Looks a session up by list number (1-based), full id or unique id prefix.
    pub fn find(&self, key: &str) -> Option<&Session> {
        return find_session(&self.sessions, key);
    }

    pub fn new_session(&mut self) -> &Session {
        let session = Session::new();
        tracing::debug!(session_id = %session.id, "created session");
        self.current_id = session.id.clone();
        self.sessions.push(session);
        self.awaiting_suggestion = false;
        return self.current();
    }

    pub fn select(&mut self, key: &str) -> Result<&Session> {
        let Some(session) = self.find(key) else {
            bail!("No chat matches \"{key}\". Use /sessions to list them.");
        };
        self.current_id = session.id.clone();
        self.awaiting_suggestion = false;
        return Ok(self.current());
    }

    /// Removes a session. When it was the current one, the most recently
    /// modified remaining session takes over, or a fresh one is created.
    pub fn delete(&mut self, key: &str) -> Result<Session> {
        let Some(id) = self.find(key).map(|s| s.id.clone()) else {
            bail!("No chat matches \"{key}\". Use /sessions to list them.");
        };

        let position = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .unwrap_or_default();
        let removed = self.sessions.remove(position);
        self.in_flight.remove(&removed.id);

        if removed.id == self.current_id {
            match self.most_recent_id() {
                Some(next) => self.current_id = next,
                None => {
                    self.new_session();
                }
            }
        }

        tracing::info!(session_id = %removed.id, "deleted session");
        return Ok(removed);
    }

    pub fn is_waiting(&self) -> bool {
        return self.in_flight.contains(&self.current_id);
    }

    pub fn has_pending_requests(&self) -> bool {
        return !self.in_flight.is_empty();
    }

    /// Starter questions for sessions that have barely begun.
    pub fn suggestions(&self) -> Option<&'static [&'static str]> {
        if !self.configured || self.current().turns.len() > 2 {
            return None;
        }
        return Some(&SUGGESTED_QUESTIONS[..SHOWN_SUGGESTIONS]);
    }

    pub fn handle_input(
        &mut self,
        input: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<InputOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(InputOutcome::Ignored);
        }

        if self.awaiting_suggestion {
            self.awaiting_suggestion = false;
            if let Ok(number) = input.parse::<usize>() {
                if (1..=SHOWN_SUGGESTIONS).contains(&number) {
                    return self.submit(SUGGESTED_QUESTIONS[number - 1], tx);
                }
            }
        }

        if let Some(command) = SlashCommand::parse(input) {
            return self.handle_slash_command(&command);
        }

        return self.submit(input, tx);
    }

    fn handle_slash_command(&mut self, command: &SlashCommand) -> Result<InputOutcome> {
        if command.is_quit() {
            return Ok(InputOutcome::Quit);
        }

        if command.is_help() {
            return Ok(InputOutcome::Show(help_text()));
        }

        if command.is_new() {
            self.new_session();
            return Ok(InputOutcome::Switched);
        }

        if command.is_sessions() {
            return Ok(InputOutcome::Show(self.sessions_listing()));
        }

        if command.is_suggest() {
            if !self.configured {
                return Ok(InputOutcome::Show(MISSING_KEY_NOTICE.to_string()));
            }
            self.awaiting_suggestion = true;
            return Ok(InputOutcome::Show(numbered(
                &SUGGESTED_QUESTIONS[..SHOWN_SUGGESTIONS],
            )));
        }

        if command.is_open() || command.is_delete() {
            let Some(target) = command.target() else {
                return Ok(InputOutcome::Show(format!(
                    "Usage: {} <number|id>",
                    command.command
                )));
            };

            if command.is_open() {
                return match self.select(target) {
                    Ok(_) => Ok(InputOutcome::Switched),
                    Err(err) => Ok(InputOutcome::Show(err.to_string())),
                };
            }

            let was_current = self.find(target).map(|s| s.id == self.current_id);
            return match self.delete(target) {
                Ok(removed) if was_current == Some(true) => {
                    tracing::debug!(title = %removed.title, "current session deleted");
                    Ok(InputOutcome::Switched)
                }
                Ok(removed) => Ok(InputOutcome::Show(format!("Deleted \"{}\".", removed.title))),
                Err(err) => Ok(InputOutcome::Show(err.to_string())),
            };
        }

        return Ok(InputOutcome::Show(format!(
            "Unknown command {}. Type /help for the list of commands.",
            command.command
        )));
    }

    /// Appends the user turn to the current session and queues the request.
    pub fn submit(&mut self, text: &str, tx: &mpsc::UnboundedSender<Action>) -> Result<InputOutcome> {
        if !self.configured {
            self.banner = Some(Banner::persistent(MISSING_KEY_NOTICE));
            return Ok(InputOutcome::Show(MISSING_KEY_NOTICE.to_string()));
        }

        if self.is_waiting() {
            self.banner = Some(Banner::transient(BUSY_NOTICE));
            return Ok(InputOutcome::Show(BUSY_NOTICE.to_string()));
        }

        let session_id = self.current_id.clone();
        let Some(session) = self.session_mut(&session_id) else {
            bail!("Current session {session_id} is missing");
        };
        let history = session.context().to_vec();
        session.push(Turn::user(text));

        tx.send(Action::ChatRequest(ChatPrompt {
            session_id: session_id.clone(),
            history,
            question: text.to_string(),
        }))?;
        self.in_flight.insert(session_id);

        return Ok(InputOutcome::Sent);
    }

    /// Appends a reply to the session that asked, wherever the user is now.
    pub fn handle_reply(&mut self, session_id: &str, text: &str) -> bool {
        self.in_flight.remove(session_id);
        let Some(session) = self.session_mut(session_id) else {
            tracing::warn!(session_id, "reply for a deleted session dropped");
            return false;
        };
        session.push(Turn::assistant(text));

        if matches!(&self.banner, Some(banner) if !banner.is_persistent()) {
            self.banner = None;
        }
        return true;
    }

    pub fn handle_failure(&mut self, session_id: &str, error: &ChatError) -> bool {
        self.in_flight.remove(session_id);
        tracing::warn!(session_id, error = %error, "chat request failed");

        if error.is_configuration() {
            self.configured = false;
            self.banner = Some(Banner::persistent(MISSING_KEY_NOTICE));
        } else {
            self.banner = Some(Banner::transient(&error.to_string()));
        }

        let Some(session) = self.session_mut(session_id) else {
            return false;
        };
        session.push(Turn::assistant(error_turn_text(error)));
        return true;
    }

    pub fn sessions_listing(&self) -> String {
        return self
            .sorted_sessions()
            .iter()
            .enumerate()
            .map(|(i, session)| {
                let marker = if session.id == self.current_id { "*" } else { " " };
                format!(
                    "{marker}{:>2}. {}  ({})  {}",
                    i + 1,
                    session.title,
                    session.short_id(),
                    session.last_modified.format("%Y-%m-%d %H:%M")
                )
            })
            .collect::<Vec<String>>()
            .join("\n");
    }

    pub async fn save(&self) -> Result<()> {
        let mut snapshot = self.sessions.clone();
        sort_by_last_modified_desc(&mut snapshot);
        self.store.save(&snapshot).await?;

        return Ok(());
    }
}

fn numbered(items: &[&str]) -> String {
    return items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect::<Vec<String>>()
        .join("\n");
}
