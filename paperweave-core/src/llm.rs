use serde::{Deserialize, Serialize};

use crate::PaperweaveError;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatResponse {
    pub content: String,
}

/// A chat-completion capable model. Implementations may be slow and may fail
/// on transport errors; callers that cannot tolerate an unbounded wait wrap
/// the call in [`run_with_timeout`](crate::run_with_timeout).
#[async_trait::async_trait]
pub trait ChatLlm: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, PaperweaveError>;
}
