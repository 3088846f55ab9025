use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use scratchbot_core::LanguageModel;
use scratchbot_core::PromptBuilder;
use tokio::sync::mpsc;

use crate::domain::models::ChatClient;
use crate::domain::models::ChatPrompt;
use crate::domain::models::Event;

/// Builds the full prompt for a question and hands it to a language model.
pub struct LanguageModelChatClient {
    model: Arc<dyn LanguageModel>,
    prompts: PromptBuilder,
}

impl LanguageModelChatClient {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: PromptBuilder) -> LanguageModelChatClient {
        return LanguageModelChatClient { model, prompts };
    }
}

#[async_trait]
impl ChatClient for LanguageModelChatClient {
    fn is_configured(&self) -> bool {
        return self.model.is_configured();
    }

    async fn send_prompt(
        &self,
        prompt: ChatPrompt,
        tx: &mpsc::UnboundedSender<Event>,
    ) -> Result<()> {
        let text = self.prompts.build(&prompt.history, &prompt.question);
        tracing::debug!(
            session_id = %prompt.session_id,
            history = self.prompts.window(&prompt.history).len(),
            "sending question"
        );

        let event = match self.model.generate(&text).await {
            Ok(reply) => Event::ChatReply {
                session_id: prompt.session_id,
                text: reply,
            },
            Err(error) => Event::ChatFailed {
                session_id: prompt.session_id,
                error,
            },
        };
        tx.send(event)?;

        return Ok(());
    }
}
