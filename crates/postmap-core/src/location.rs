//! Location guesses and resolved coordinates.

use serde::{Deserialize, Serialize};

/// Value the extractor reports when the model names no place.
pub const LOCATION_NOT_FOUND: &str = "Not Found";

/// Placeholder stored when the inference service sends no reasoning trace.
pub const THINKING_NOT_FOUND: &str = "Reasoning field not found in message payload.";

/// Structured output of the location extractor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationGuess {
    /// Place name, or [`LOCATION_NOT_FOUND`].
    pub location: String,
    /// Model reasoning, or [`THINKING_NOT_FOUND`].
    pub thinking: String,
    pub model: String,
    /// Wall time reported by the inference service, in seconds (3 decimals).
    pub elapsed_secs: f64,
}

impl LocationGuess {
    /// The place name worth geocoding, if any.
    ///
    /// Blank names and the "not found" sentinel yield `None`.
    #[must_use]
    pub fn place_name(&self) -> Option<&str> {
        let name = self.location.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(LOCATION_NOT_FOUND) {
            None
        } else {
            Some(name)
        }
    }

    /// `false` when `thinking` holds the placeholder rather than model output.
    #[must_use]
    pub fn has_thinking(&self) -> bool {
        self.thinking != THINKING_NOT_FOUND
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A geocoder hit: the coordinate plus the provider's display address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub coordinate: Coordinate,
    pub address: String,
}
