use postmap_core::FailureKind;
use thiserror::Error;

/// Errors returned by the geocoding client.
///
/// "No match" is not an error; see [`crate::GeocodeOutcome::NotFound`].
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding service timed out for \"{query}\"")]
    Timeout { query: String },

    #[error("geocoding service error: {0}")]
    Service(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GeocodeError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            GeocodeError::Timeout { .. } => FailureKind::GeocodingTimeout,
            GeocodeError::Service(_) | GeocodeError::Deserialize { .. } => {
                FailureKind::GeocodingServiceError
            }
        }
    }
}
