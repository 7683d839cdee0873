//! Geocoder: resolves a free-text place name to a coordinate through a
//! Nominatim-compatible search API.

pub mod client;
pub mod error;
mod types;

pub use client::{GeocodeOutcome, Geocoder};
pub use error::GeocodeError;
