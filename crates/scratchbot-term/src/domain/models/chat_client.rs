use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::ChatPrompt;
use crate::domain::models::Event;

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// False when sends are bound to fail, e.g. no API key.
    fn is_configured(&self) -> bool;
    async fn send_prompt(
        &self,
        prompt: ChatPrompt,
        event_tx: &mpsc::UnboundedSender<Event>,
    ) -> Result<()>;
}

pub type ChatClientBox = Box<dyn ChatClient>;
