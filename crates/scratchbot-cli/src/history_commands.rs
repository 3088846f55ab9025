use anyhow::Result;
use anyhow::anyhow;
use scratchbot_core::history::{find_session, sort_by_last_modified_desc};
use scratchbot_core::{Session, SessionStore};
use scratchbot_term::Renderer;

/// Newest first, numbered the way `/open` and `sessions show` accept them.
pub fn format_listing(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return "No saved chats.".to_string();
    }

    let mut sorted = sessions.to_vec();
    sort_by_last_modified_desc(&mut sorted);
    sorted
        .iter()
        .enumerate()
        .map(|(i, session)| {
            format!(
                "{:>2}. {}  ({})  {}\n    {}",
                i + 1,
                session.title,
                session.short_id(),
                session.last_modified.format("%Y-%m-%d %H:%M"),
                session.preview
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

pub async fn list(store: &SessionStore) -> Result<()> {
    let sessions = store.load().await?;
    println!("{}", format_listing(&sessions));
    Ok(())
}

pub async fn show(store: &SessionStore, key: &str, renderer: &Renderer) -> Result<()> {
    let sessions = store.load().await?;
    let session = find_session(&sessions, key)
        .ok_or_else(|| anyhow!("No chat matches \"{key}\". Run `scratchbot sessions list`."))?;

    println!("{}", renderer.render_session(session));
    Ok(())
}

/// Removes one session and rewrites the snapshot. `confirm` sees the session
/// first and may decline, in which case nothing is written.
pub async fn delete<F>(store: &SessionStore, key: &str, confirm: F) -> Result<Option<Session>>
where
    F: FnOnce(&Session) -> Result<bool>,
{
    let mut sessions = store.load().await?;
    let id = find_session(&sessions, key)
        .map(|s| s.id.clone())
        .ok_or_else(|| anyhow!("No chat matches \"{key}\". Run `scratchbot sessions list`."))?;

    let Some(position) = sessions.iter().position(|s| s.id == id) else {
        return Ok(None);
    };
    if !confirm(&sessions[position])? {
        log::info!("Deletion of session {id} cancelled");
        return Ok(None);
    }

    let removed = sessions.remove(position);
    sort_by_last_modified_desc(&mut sessions);
    store.save(&sessions).await?;

    log::info!("Deleted session {}", removed.id);
    Ok(Some(removed))
}
