//! Wire types for the chat endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    /// Ollama's JSON mode: constrains the reply content to a JSON document.
    pub format: &'static str,
    pub stream: bool,
    pub messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub model: Option<String>,
    pub message: ResponseMessage,
    /// Nanoseconds.
    pub total_duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: String,
    pub thinking: Option<String>,
}

/// Shape the prompt asks the model to produce inside `message.content`.
#[derive(Debug, Deserialize)]
pub(crate) struct LocationAnswer {
    pub location: Option<String>,
}
