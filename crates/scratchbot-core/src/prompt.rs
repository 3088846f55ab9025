//! Prompt assembly for the Scratch helper.
//!
//! Every request is a single text part: the Scratch-only preamble, the most
//! recent turns of the conversation, the new question, and the fixed
//! instructions that keep the model on topic.

use crate::core_types::Turn;

pub const DEFAULT_MAX_HISTORY_TURNS: usize = 10;

const CONVERSATION_SLOT: &str = "{conversation}";
const QUESTION_SLOT: &str = "{question}";

pub const WELCOME_MESSAGE: &str = "Hi! I'm your Scratch programming assistant powered by Google Gemini. I can help you with Scratch blocks, sprites, sounds, animations, games, and any programming concepts. What would you like to learn about?";

pub const OFF_TOPIC_REPLY: &str = "I'm your Scratch helper! I can only answer questions about Scratch programming. Would you like to learn about making games, animations, or other fun projects in Scratch?";

pub const DEFAULT_PREAMBLE: &str = r#"Hi! I'm your friendly Scratch helper! 🐱

I'm a specialized Scratch programming assistant, which means I can only help with:
- Scratch blocks and scripts
- Sprite actions and costumes
- Stage and backdrop features
- Scratch game development
- Basic programming concepts in Scratch

When I explain Scratch blocks, I'll show them like this:

🔵 Motion Blocks:
[when green flag clicked ▶️]
[move (10) steps]

🟣 Looks Blocks:
[say [Hello!] for (2) seconds]
[switch costume to (costume1)]

💖 Sound Blocks:
[play sound (Meow) until done]

💛 Events Blocks:
[when (space) key pressed]

🟧 Control Blocks:
[forever]
[if <touching (mouse-pointer)?> then]

🔍 Sensing Blocks:
<touching color [#FF0000]?>

💚 Operators Blocks:
((2) + (2))
<(my variable) > (50)>

📦 Variables:
(my variable)
[set [my variable] to (0)]

Important: I can only answer questions about Scratch programming. If you ask about other topics, I'll kindly remind you to focus on Scratch-related questions! 🎮
{conversation}
Your Scratch question: {question}"#;

/// Starter questions offered on a fresh session.
pub const SUGGESTED_QUESTIONS: [&str; 8] = [
    "How do I make a sprite move with arrow keys?",
    "What is a forever loop and how do I use it?",
    "How can I make my sprite change costumes?",
    "How do I add sounds to my project?",
    "What are variables and how do I use them?",
    "How do I make a simple game in Scratch?",
    "How do I make my sprite bounce off the edges?",
    "What are if-then blocks and when do I use them?",
];

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    preamble: String,
    max_history_turns: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PREAMBLE.to_string(), DEFAULT_MAX_HISTORY_TURNS)
    }
}

impl PromptBuilder {
    /// `preamble` may contain `{conversation}` and `{question}` slots; missing
    /// slots are appended in that order.
    pub fn new(preamble: String, max_history_turns: usize) -> Self {
        Self {
            preamble,
            max_history_turns,
        }
    }

    pub fn max_history_turns(&self) -> usize {
        self.max_history_turns
    }

    /// The tail of `history` that fits in the context window, oldest first.
    pub fn window<'a>(&self, history: &'a [Turn]) -> &'a [Turn] {
        let start = history.len().saturating_sub(self.max_history_turns);
        &history[start..]
    }

    pub fn build(&self, history: &[Turn], question: &str) -> String {
        let conversation = self.render_conversation(self.window(history));
        let question = question.trim();

        // Slots are only recognised in the preamble, never in the text filled in.
        let mut prompt = self
            .preamble
            .split(CONVERSATION_SLOT)
            .map(|part| part.replace(QUESTION_SLOT, question))
            .collect::<Vec<String>>()
            .join(&conversation);

        if !self.preamble.contains(CONVERSATION_SLOT) {
            prompt = format!("{}{}", prompt.trim_end(), conversation);
        }
        if !self.preamble.contains(QUESTION_SLOT) {
            prompt.push_str("\n\nYour Scratch question: ");
            prompt.push_str(question);
        }

        prompt.push_str("\n\n");
        prompt.push_str(&instructions());
        prompt
    }

    fn render_conversation(&self, turns: &[Turn]) -> String {
        if turns.is_empty() {
            return String::new();
        }

        let lines = turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role.label(), turn.text.trim()))
            .collect::<Vec<String>>()
            .join("\n");

        format!("\nPrevious conversation:\n{lines}\n")
    }
}

fn instructions() -> String {
    format!(
        r#"Instructions for AI:
1. Only respond to questions about Scratch programming
2. For non-Scratch questions, reply: "{OFF_TOPIC_REPLY}"
3. Always use block formatting when showing Scratch code
4. Keep explanations simple and beginner-friendly
5. Include emojis matching block colors when showing code examples"#
    )
}
