//! Run outcome types owned by the orchestrator.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::fire::FireDetection;
use crate::location::{Coordinate, GeocodedPlace, LocationGuess};
use crate::post::PostText;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetching,
    Extracting,
    Geocoding,
    FetchingFires,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetching => write!(f, "fetching post"),
            Stage::Extracting => write!(f, "extracting location"),
            Stage::Geocoding => write!(f, "geocoding"),
            Stage::FetchingFires => write!(f, "fetching fire detections"),
        }
    }
}

/// Typed failure taxonomy shared by all stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    InvalidReference,
    FetchError,
    NoPreviewData,
    PromptResourceMissing,
    MalformedModelOutput,
    InferenceServiceError,
    GeocodingTimeout,
    GeocodingServiceError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

/// Why a run finished cleanly without a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoLocationReason {
    /// The post exists but carries no text.
    EmptyPost,
    /// The model answered, but named no place.
    ModelFoundNothing,
    /// The geocoder had no match for the guessed place.
    Unresolved,
}

impl fmt::Display for NoLocationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoLocationReason::EmptyPost => write!(f, "post contains no text content"),
            NoLocationReason::ModelFoundNothing => write!(f, "model found no location in the post"),
            NoLocationReason::Unresolved => write!(f, "geocoder could not resolve the location"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// A coordinate was resolved.
    Located,
    /// The pipeline completed correctly but produced no coordinate.
    NoLocation { reason: NoLocationReason },
    Failed(StageFailure),
}

impl RunStatus {
    /// Coarse label: `success`, `partial`, or `failure`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Located => "success",
            RunStatus::NoLocation { .. } => "partial",
            RunStatus::Failed(_) => "failure",
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, RunStatus::Failed(_))
    }
}

/// Mutable accumulator for one run. Turned into a [`PipelineResult`] exactly
/// once by [`RunDraft::finish`].
#[derive(Debug)]
pub struct RunDraft {
    pub reference: String,
    pub started_at: DateTime<Utc>,
    pub post_text: Option<PostText>,
    pub guess: Option<LocationGuess>,
    pub place: Option<GeocodedPlace>,
    pub fires: Option<Vec<FireDetection>>,
}

impl RunDraft {
    #[must_use]
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.to_owned(),
            started_at: Utc::now(),
            post_text: None,
            guess: None,
            place: None,
            fires: None,
        }
    }

    /// Freeze the draft.
    ///
    /// Fire detections without a coordinate are dropped: they only have
    /// meaning relative to a resolved place.
    #[must_use]
    pub fn finish(self, status: RunStatus, version: u64) -> PipelineResult {
        let fires = if self.place.is_some() { self.fires } else { None };
        PipelineResult {
            run_id: Uuid::new_v4(),
            version,
            started_at: self.started_at,
            finished_at: Utc::now(),
            reference: self.reference,
            status,
            post_text: self.post_text,
            guess: self.guess,
            place: self.place,
            fires,
        }
    }
}

/// Aggregate outcome of one run. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    run_id: Uuid,
    version: u64,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    reference: String,
    status: RunStatus,
    post_text: Option<PostText>,
    guess: Option<LocationGuess>,
    place: Option<GeocodedPlace>,
    fires: Option<Vec<FireDetection>>,
}

impl PipelineResult {
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Position of this run in its session (1 for the first run).
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// The reference as the user typed it.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    #[must_use]
    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    #[must_use]
    pub fn post_text(&self) -> Option<&PostText> {
        self.post_text.as_ref()
    }

    #[must_use]
    pub fn guess(&self) -> Option<&LocationGuess> {
        self.guess.as_ref()
    }

    #[must_use]
    pub fn place(&self) -> Option<&GeocodedPlace> {
        self.place.as_ref()
    }

    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.place.as_ref().map(|p| p.coordinate)
    }

    /// `None` when fires were not requested or not reached; `Some(&[])` when
    /// requested and nothing was found.
    #[must_use]
    pub fn fires(&self) -> Option<&[FireDetection]> {
        self.fires.as_deref()
    }
}
