use super::message::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    QuitRequested,
    Command(ShellCommand),
    LiveMessage(Message),
}

/// A parsed line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    ListGroups,
    CreateGroup(String),
    OpenGroup(String),
    Send(String),
    Help,
}

impl ShellCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let Some(rest) = trimmed.strip_prefix('/') else {
            return Some(Self::Send(line.to_owned()));
        };

        let (command, argument) = match rest.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (rest, ""),
        };

        let parsed = match command {
            "groups" => Self::ListGroups,
            "create" => Self::CreateGroup(argument.to_owned()),
            "open" | "join" => Self::OpenGroup(argument.to_owned()),
            "help" => Self::Help,
            _ => Self::Send(line.to_owned()),
        };

        Some(parsed)
    }
}
