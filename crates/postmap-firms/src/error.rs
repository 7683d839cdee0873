use thiserror::Error;

/// Failure of a single satellite source.
///
/// Never escapes [`crate::FirmsClient::fetch_nearby`]; a failing source is
/// logged and skipped there.
#[derive(Debug, Error)]
pub enum FirmsError {
    #[error("HTTP request to {source_name} failed: {source}")]
    Http {
        source_name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{source_name} returned status {status}: {body}")]
    UnexpectedStatus {
        source_name: String,
        status: u16,
        body: String,
    },

    #[error("CSV parse error for {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
}
