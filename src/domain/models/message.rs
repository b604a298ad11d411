#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Role;

/// One chat turn. Content, role, timestamp and id are fixed at creation; only
/// the pinned flag changes afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    role: Role,
    content: String,
    timestamp: DateTime<Local>,
    #[serde(default)]
    is_command: bool,
    #[serde(default)]
    is_pinned: bool,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            id: Some(Uuid::new_v4().to_string()),
            role,
            content: content.to_string(),
            timestamp: Local::now(),
            is_command: false,
            is_pinned: false,
        };
    }

    /// System feedback produced by running a slash command.
    pub fn command(content: &str) -> Message {
        let mut message = Message::new(Role::System, content);
        message.is_command = true;
        return message;
    }

    pub fn id(&self) -> Option<&str> {
        return self.id.as_deref();
    }

    pub fn role(&self) -> Role {
        return self.role;
    }

    pub fn content(&self) -> &str {
        return &self.content;
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        return self.timestamp;
    }

    pub fn is_command(&self) -> bool {
        return self.is_command;
    }

    pub fn is_pinned(&self) -> bool {
        return self.is_pinned;
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.is_pinned = pinned;
    }

    pub fn pinned_copy(&self) -> Message {
        let mut message = self.clone();
        message.is_pinned = true;
        return message;
    }

    pub fn has_id(&self, id: &str) -> bool {
        return self.id.as_deref() == Some(id);
    }
}
