use std::io::Write;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::services::AppState;
use crate::domain::services::AppStateProps;
use crate::domain::services::EventsService;
use crate::domain::services::InputOutcome;
use crate::domain::services::Renderer;

const PROMPT: &str = "> ";
const THINKING_NOTICE: &str = "Scratchbot is thinking...";

fn print_prompt() -> Result<()> {
    print!("{PROMPT}");
    std::io::stdout().flush()?;
    return Ok(());
}

fn draw_session(app_state: &AppState, renderer: &Renderer) {
    println!("{}", renderer.render_session(app_state.current()));
    if let Some(banner) = &app_state.banner {
        println!("\n{}", renderer.render_banner(banner));
    }
    if let Some(suggestions) = app_state.suggestions() {
        println!("\n{}", renderer.render_suggestions(suggestions));
    }
    println!();
}

async fn persist(app_state: &AppState) {
    if let Err(err) = app_state.save().await {
        tracing::error!("failed to save history: {err:?}");
        eprintln!("Could not save chat history: {err}");
    }
}

/// Runs the interactive chat until the user quits or stdin closes with no
/// answers outstanding. History is saved after every change.
pub async fn start_loop(
    props: AppStateProps,
    renderer: Renderer,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(props).await?;
    let mut events = EventsService::new(rx);
    let mut input_closed = false;

    draw_session(&app_state, &renderer);
    print_prompt()?;

    loop {
        match events.next().await? {
            Event::UserInput(line) => match app_state.handle_input(&line, &tx)? {
                InputOutcome::Quit => break,
                InputOutcome::Ignored => {}
                InputOutcome::Sent => {
                    println!("{}", renderer.render_notice(THINKING_NOTICE));
                    persist(&app_state).await;
                }
                InputOutcome::Show(text) => {
                    println!("{text}");
                    persist(&app_state).await;
                }
                InputOutcome::Switched => {
                    draw_session(&app_state, &renderer);
                    persist(&app_state).await;
                }
            },
            Event::ChatReply { session_id, text } => {
                let for_current = session_id == app_state.current_id;
                if app_state.handle_reply(&session_id, &text) {
                    if for_current {
                        if let Some(turn) = app_state.current().turns.last() {
                            println!("\n{}\n", renderer.render_turn(turn));
                        }
                    } else {
                        println!("{}", renderer.render_notice(&reply_notice(&app_state, &session_id)));
                    }
                    persist(&app_state).await;
                }
            }
            Event::ChatFailed { session_id, error } => {
                let for_current = session_id == app_state.current_id;
                if app_state.handle_failure(&session_id, &error) {
                    if for_current {
                        if let Some(turn) = app_state.current().turns.last() {
                            println!("\n{}\n", renderer.render_turn(turn));
                        }
                    }
                    persist(&app_state).await;
                }
                if let Some(banner) = &app_state.banner {
                    println!("{}", renderer.render_banner(banner));
                }
            }
            Event::InputClosed => {
                input_closed = true;
            }
        }

        if input_closed {
            if !app_state.has_pending_requests() {
                break;
            }
            continue;
        }
        print_prompt()?;
    }

    persist(&app_state).await;
    return Ok(());
}

fn reply_notice(app_state: &AppState, session_id: &str) -> String {
    let title = app_state
        .sessions
        .iter()
        .find(|s| s.id == session_id)
        .map(|s| s.title.as_str())
        .unwrap_or_default();

    return format!("New answer in \"{title}\". Use /sessions and /open to read it.");
}
