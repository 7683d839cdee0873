use postmap_extractor::ExtractError;
use postmap_geocoder::GeocodeError;
use postmap_scraper::PostError;
use thiserror::Error;

/// Failure to construct one of the stage clients.
///
/// Run-time failures never surface as errors; they are recorded in the
/// run's [`postmap_core::RunStatus`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("post fetcher: {0}")]
    Fetcher(#[from] PostError),

    #[error("location extractor: {0}")]
    Extractor(#[from] ExtractError),

    #[error("geocoder: {0}")]
    Geocoder(#[from] GeocodeError),

    #[error("FIRMS client: {0}")]
    Firms(#[from] reqwest::Error),
}
