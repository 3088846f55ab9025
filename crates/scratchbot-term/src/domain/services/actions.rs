use std::sync::Arc;

use anyhow::Result;
use scratchbot_core::ChatError;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::ChatClientBox;
use crate::domain::models::ChatPrompt;
use crate::domain::models::Event;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /new (/n) - Starts a new chat.
- /sessions (/s) - Lists your chats, newest first. The current chat is marked with *.
- /open (/o) [NUMBER|ID] - Switches to a chat from the /sessions list.
- /delete (/d) [NUMBER|ID] - Deletes a chat. Deleting the current chat switches to your most recent one.
- /suggest - Shows starter questions. Type a suggestion's number on its own to ask it.
- /quit /exit (/q) - Exit Scratchbot.
- /help (/h) - Provides this help menu.

Anything else you type is sent as a question about Scratch. Code blocks in answers are colored by block category, the same colors you see in the Scratch editor.
        "#;

    text.trim().to_string()
}

fn worker_error(
    session_id: String,
    err: anyhow::Error,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    tracing::error!(%session_id, "chat client failed: {err:?}");
    event_tx.send(Event::ChatFailed {
        session_id,
        error: ChatError::Transport(err.to_string()),
    })?;

    Ok(())
}

async fn send_prompt_to_client(
    chat_client: &ChatClientBox,
    prompt: ChatPrompt,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    chat_client.send_prompt(prompt, event_tx).await
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs every request in its own task so one slow chat never holds up
    /// another. Returns once all action senders are gone.
    pub async fn start(
        chat_client: ChatClientBox,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let chat_client_arc = Arc::new(chat_client);

        while let Some(action) = rx.recv().await {
            let worker_event_tx = event_tx.clone();
            match action {
                Action::ChatRequest(prompt) => {
                    let client_worker = chat_client_arc.clone();
                    tokio::spawn(async move {
                        let session_id = prompt.session_id.clone();
                        if let Err(err) =
                            send_prompt_to_client(&client_worker, prompt, &worker_event_tx).await
                        {
                            worker_error(session_id, err, &worker_event_tx)?;
                        }
                        Ok::<(), anyhow::Error>(())
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ChatClient;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct MockChatClient {
        prompt_fn: Box<dyn Fn(&ChatPrompt) -> Result<Option<String>> + Send + Sync>,
        delay: Duration,
    }

    #[async_trait]
    impl ChatClient for MockChatClient {
        fn is_configured(&self) -> bool {
            true
        }

        async fn send_prompt(
            &self,
            prompt: ChatPrompt,
            tx: &mpsc::UnboundedSender<Event>,
        ) -> Result<()> {
            tokio::time::sleep(self.delay).await;
            if let Some(text) = (self.prompt_fn)(&prompt)? {
                tx.send(Event::ChatReply {
                    session_id: prompt.session_id,
                    text,
                })?;
            }
            Ok(())
        }
    }

    fn prompt(session_id: &str, question: &str) -> ChatPrompt {
        ChatPrompt {
            session_id: session_id.to_string(),
            history: vec![],
            question: question.to_string(),
        }
    }

    #[tokio::test]
    async fn test_requests_reach_the_client() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let chat_client = MockChatClient {
            prompt_fn: Box::new(|prompt: &ChatPrompt| {
                Ok(Some(format!("echo: {}", prompt.question)))
            }),
            delay: Duration::ZERO,
        };

        tokio::spawn(async move {
            ActionsService::start(Box::new(chat_client), event_tx, &mut action_rx)
                .await
                .unwrap();
        });

        action_tx
            .send(Action::ChatRequest(prompt("a", "What is a sprite?")))
            .unwrap();

        match event_rx.recv().await.unwrap() {
            Event::ChatReply { session_id, text } => {
                assert_eq!(session_id, "a");
                assert_eq!(text, "echo: What is a sprite?");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_session_does_not_block_others() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let chat_client = MockChatClient {
            prompt_fn: Box::new(|prompt: &ChatPrompt| Ok(Some(prompt.session_id.clone()))),
            delay: Duration::from_millis(200),
        };
        tokio::spawn(async move {
            ActionsService::start(Box::new(chat_client), event_tx, &mut action_rx)
                .await
                .unwrap();
        });

        action_tx.send(Action::ChatRequest(prompt("a", "one"))).unwrap();
        action_tx.send(Action::ChatRequest(prompt("b", "two"))).unwrap();

        let started = tokio::time::Instant::now();
        let mut replied = vec![];
        for _ in 0..2 {
            if let Event::ChatReply { session_id, .. } = event_rx.recv().await.unwrap() {
                replied.push(session_id);
            }
        }
        replied.sort();
        assert_eq!(replied, vec!["a".to_string(), "b".to_string()]);
        assert!(started.elapsed() < Duration::from_millis(380));
    }

    #[tokio::test]
    async fn test_client_errors_become_failures_for_that_session() {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let chat_client = MockChatClient {
            prompt_fn: Box::new(|_: &ChatPrompt| bail!("channel closed")),
            delay: Duration::ZERO,
        };
        tokio::spawn(async move {
            ActionsService::start(Box::new(chat_client), event_tx, &mut action_rx)
                .await
                .unwrap();
        });

        action_tx.send(Action::ChatRequest(prompt("c", "hi"))).unwrap();

        match event_rx.recv().await.unwrap() {
            Event::ChatFailed { session_id, error } => {
                assert_eq!(session_id, "c");
                assert!(matches!(error, ChatError::Transport(_)));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_help_text_lists_every_command() {
        let help = help_text();
        for command in ["/new", "/sessions", "/open", "/delete", "/suggest", "/quit", "/help"] {
            assert!(help.contains(command), "{command}");
        }
    }
}
