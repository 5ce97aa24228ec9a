use serde::Serialize;

/// Position of a message in its transcript. Ids only ever grow within one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
    /// Placeholder shown while a request is in flight; its content is display-only.
    Loading,
    Error,
}

/// One transcript entry. Never modified once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(id: MessageId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.role == Role::Loading
    }
}
