use postmap_core::{FailureKind, ReferenceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    InvalidReference(#[from] ReferenceError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no og:description preview tag found at {url}")]
    NoPreviewData { url: String },
}

impl PostError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            PostError::InvalidReference(_) => FailureKind::InvalidReference,
            PostError::Client(_) | PostError::Http { .. } | PostError::UnexpectedStatus { .. } => {
                FailureKind::FetchError
            }
            PostError::NoPreviewData { .. } => FailureKind::NoPreviewData,
        }
    }
}
