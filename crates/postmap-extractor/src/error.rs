use std::path::PathBuf;

use postmap_core::FailureKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to load prompt from {}: {source}", path.display())]
    PromptResourceMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model replied, but `message.content` is not the expected JSON.
    /// `raw` is the reply exactly as received.
    #[error("model did not return valid JSON in the content field: {source}")]
    MalformedModelOutput {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("inference service error: {0}")]
    InferenceService(String),
}

impl ExtractError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractError::PromptResourceMissing { .. } => FailureKind::PromptResourceMissing,
            ExtractError::MalformedModelOutput { .. } => FailureKind::MalformedModelOutput,
            ExtractError::InferenceService(_) => FailureKind::InferenceServiceError,
        }
    }
}
