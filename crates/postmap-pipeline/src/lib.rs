//! Pipeline orchestrator: sequences fetch, extraction, geocoding and the
//! optional fire lookup, and owns the per-session result.

pub mod error;
pub mod pipeline;
pub mod session;

pub use error::BuildError;
pub use pipeline::{Pipeline, Progress, RunRequest};
pub use session::Session;
