//! HTTP client for the Nominatim search API.

use std::time::Duration;

use postmap_core::{Coordinate, GeocodedPlace};
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::SearchCandidate;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Result of a successful geocoding query.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(GeocodedPlace),
    /// The service answered and had no match. A definite negative, unlike
    /// [`GeocodeError`], which may succeed on retry.
    NotFound,
}

/// Client for a Nominatim-compatible geocoding service.
///
/// Use [`Geocoder::new`] for the public OpenStreetMap instance or
/// [`Geocoder::with_base_url`] for a self-hosted instance or a mock server.
pub struct Geocoder {
    client: Client,
    search_url: Url,
}

impl Geocoder {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Service`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(user_agent, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// Nominatim's usage policy requires an identifying `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Service`] if the client cannot be built or
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        user_agent: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocodeError::Service(format!("client build failed: {e}")))?;

        let raw = format!("{}/search", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&raw)
            .map_err(|e| GeocodeError::Service(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self { client, search_url })
    }

    /// Resolves `place_name` with a single query. The first candidate wins.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Timeout`] when the request times out.
    /// - [`GeocodeError::Service`] on any other transport failure, a non-2xx
    ///   status, or a candidate with non-numeric coordinates.
    /// - [`GeocodeError::Deserialize`] if the body is not a candidate array.
    pub async fn geocode(&self, place_name: &str) -> Result<GeocodeOutcome, GeocodeError> {
        let url = self.build_url(place_name);
        tracing::info!(query = place_name, "geocoding");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                GeocodeError::Timeout {
                    query: place_name.to_owned(),
                }
            } else {
                GeocodeError::Service(format!("request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Service(format!(
                "unexpected HTTP status {status}"
            )));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GeocodeError::Timeout {
                    query: place_name.to_owned(),
                }
            } else {
                GeocodeError::Service(format!("failed to read body: {e}"))
            }
        })?;

        let candidates: Vec<SearchCandidate> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("search(q={place_name})"),
                source: e,
            })?;

        let Some(first) = candidates.into_iter().next() else {
            tracing::warn!(query = place_name, "no coordinates found");
            return Ok(GeocodeOutcome::NotFound);
        };

        let place = to_place(first)?;
        tracing::info!(
            query = place_name,
            address = %place.address,
            lat = place.coordinate.lat,
            lon = place.coordinate.lon,
            "geocoded"
        );
        Ok(GeocodeOutcome::Found(place))
    }

    fn build_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        url
    }
}

fn to_place(candidate: SearchCandidate) -> Result<GeocodedPlace, GeocodeError> {
    let parse = |field: &str, raw: &str| -> Result<f64, GeocodeError> {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| GeocodeError::Service(format!("invalid {field} '{raw}': {e}")))
    };

    let lat = parse("latitude", &candidate.lat)?;
    let lon = parse("longitude", &candidate.lon)?;

    Ok(GeocodedPlace {
        coordinate: Coordinate::new(lat, lon),
        address: candidate.display_name,
    })
}
