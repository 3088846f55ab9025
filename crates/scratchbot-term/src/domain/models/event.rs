use scratchbot_core::ChatError;

#[derive(Debug)]
pub enum Event {
    ChatReply { session_id: String, text: String },
    ChatFailed { session_id: String, error: ChatError },
    UserInput(String),
    InputClosed,
}
