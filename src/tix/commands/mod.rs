use crate::model::Ticket;

pub mod add;
pub mod attach;
pub mod comment;
pub mod init;
pub mod list;
pub mod show;
pub mod status;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Structured outcome of a command: data for the presentation layer plus
/// leveled messages. Commands never print.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected: Vec<Ticket>,
    pub listed: Vec<Ticket>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, tickets: Vec<Ticket>) -> Self {
        self.affected = tickets;
        self
    }

    pub fn with_listed(mut self, tickets: Vec<Ticket>) -> Self {
        self.listed = tickets;
        self
    }
}
