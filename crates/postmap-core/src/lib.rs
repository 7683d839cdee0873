//! Shared model and configuration for the postmap pipeline.
//!
//! Every stage crate speaks in the types defined here: a validated
//! [`PostReference`] goes in, a [`PipelineResult`] comes out.

pub mod app_config;
pub mod config;
pub mod fire;
pub mod location;
pub mod post;
pub mod result;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{
    build_app_config, load_app_config, load_app_config_from_env, load_firms_api_key,
    DEFAULT_BROWSER_USER_AGENT, PLACEHOLDER_FIRMS_KEY,
};
pub use fire::{FireDetection, SOURCE_COLUMN};
pub use location::{
    Coordinate, GeocodedPlace, LocationGuess, LOCATION_NOT_FOUND, THINKING_NOT_FOUND,
};
pub use post::{normalize_reference, PostReference, PostText, ReferenceError};
pub use result::{
    FailureKind, NoLocationReason, PipelineResult, RunDraft, RunStatus, Stage, StageFailure,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
