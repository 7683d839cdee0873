//! Fire Detection Fetcher: queries the NASA FIRMS area API for active-fire
//! hot spots around a coordinate, across several satellite products.

pub mod bbox;
pub mod client;
pub mod error;

pub use bbox::BoundingBox;
pub use client::{FirmsClient, SOURCES};
pub use error::FirmsError;
