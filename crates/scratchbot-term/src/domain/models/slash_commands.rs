#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashCommand {
    pub command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let mut parts = text.split_whitespace();
        let command = parts.next()?.to_lowercase();
        if command.len() < 2 {
            return None;
        }

        return Some(SlashCommand {
            command,
            args: parts.map(|arg| arg.to_string()).collect(),
        });
    }

    /// First argument, used by commands that take a session number or id.
    pub fn target(&self) -> Option<&str> {
        return self.args.first().map(|arg| arg.as_str());
    }

    pub fn is_new(&self) -> bool {
        return self.command == "/new" || self.command == "/n";
    }

    pub fn is_sessions(&self) -> bool {
        return self.command == "/sessions" || self.command == "/s";
    }

    pub fn is_open(&self) -> bool {
        return self.command == "/open" || self.command == "/o";
    }

    pub fn is_delete(&self) -> bool {
        return self.command == "/delete" || self.command == "/d";
    }

    pub fn is_suggest(&self) -> bool {
        return self.command == "/suggest";
    }

    pub fn is_help(&self) -> bool {
        return self.command == "/help" || self.command == "/h";
    }

    pub fn is_quit(&self) -> bool {
        return ["/quit", "/exit", "/q"].contains(&self.command.as_str());
    }

    pub fn is_known(&self) -> bool {
        return self.is_new()
            || self.is_sessions()
            || self.is_open()
            || self.is_delete()
            || self.is_suggest()
            || self.is_help()
            || self.is_quit();
    }
}
