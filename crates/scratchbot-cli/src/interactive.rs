use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use scratchbot_core::errors::MISSING_KEY_NOTICE;
use scratchbot_core::{GeminiClient, LanguageModel, ScratchbotConfig, SessionStore};
use scratchbot_term::{
    start_loop, Action, ActionsService, AppStateProps, Event, LanguageModelChatClient, Renderer,
};
use tokio::sync::mpsc;
use tokio::task;

use crate::settings::prompt_builder;

/// Runs the chat loop with the actions worker alongside it, the same
/// channel layout for every front end.
pub async fn run_chat(
    config: &ScratchbotConfig,
    renderer: Renderer,
    session_id: Option<String>,
    new_session: bool,
) -> Result<()> {
    let model: Arc<dyn LanguageModel> = Arc::new(GeminiClient::from_config(&config.llm));
    let configured = model.is_configured();
    if !configured {
        log::warn!("Starting without an API key; questions will not be sent");
    }

    let history_path = config.history_path()?;
    log::info!("Using history file {}", history_path.display());

    let chat_client = Box::new(LanguageModelChatClient::new(model, prompt_builder(config)));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        ActionsService::start(chat_client, event_tx, &mut action_rx).await
    });

    let app_state_props = AppStateProps {
        store: SessionStore::new(history_path),
        configured,
        session_id,
        new_session,
    };

    let ui_future = start_loop(app_state_props, renderer, action_tx, event_rx);

    let result = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(err)) => Err(err.into()),
            None => Ok(()),
        },
        res = ui_future => res,
    );

    background_futures.abort_all();
    result
}

/// Asks one question with no history and prints the answer. Nothing is saved.
pub async fn run_task(config: &ScratchbotConfig, renderer: Renderer, question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("Task mode requires a question. Use --task \"your question here\"");
    }

    let client = GeminiClient::from_config(&config.llm);
    if !client.is_configured() {
        bail!(MISSING_KEY_NOTICE);
    }

    log::info!("Executing task with model {}", client.model());
    let prompt = prompt_builder(config).build(&[], question);
    let reply = client.generate(&prompt).await?;

    println!("{}", renderer.render_markdown(&reply));
    Ok(())
}
