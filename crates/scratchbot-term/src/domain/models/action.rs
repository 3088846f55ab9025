use scratchbot_core::Turn;

/// Everything a client needs to answer one question.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub session_id: String,
    pub history: Vec<Turn>,
    pub question: String,
}

#[derive(Debug, Clone)]
pub enum Action {
    ChatRequest(ChatPrompt),
}
