//! Single-run orchestration.

use std::fmt::Display;

use postmap_core::{
    AppConfig, FailureKind, NoLocationReason, PipelineResult, PostText, RunDraft, RunStatus,
    Stage, StageFailure,
};
use postmap_extractor::LocationExtractor;
use postmap_firms::FirmsClient;
use postmap_geocoder::{GeocodeOutcome, Geocoder};
use postmap_scraper::PostFetcher;

use crate::error::BuildError;

/// Parameters for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    /// Post address as the user typed it.
    pub reference: String,
    pub fetch_fires: bool,
    pub radius_km: f64,
    pub day_range: u32,
}

impl RunRequest {
    /// Request without fire lookup, using the configured search defaults.
    #[must_use]
    pub fn new(reference: impl Into<String>, config: &AppConfig) -> Self {
        Self {
            reference: reference.into(),
            fetch_fires: false,
            radius_km: config.fire_radius_km,
            day_range: config.fire_day_range,
        }
    }

    #[must_use]
    pub fn with_fires(mut self, fetch_fires: bool) -> Self {
        self.fetch_fires = fetch_fires;
        self
    }
}

/// Progress events reported while a run advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    StageStarted(Stage),
    /// Coarse completion: 33 once text is in hand, 66 once a coordinate is
    /// known, 100 when the run ends cleanly, 0 when it fails.
    Percent(u8),
}

/// The four stage clients, wired in execution order.
pub struct Pipeline {
    fetcher: PostFetcher,
    extractor: LocationExtractor,
    geocoder: Geocoder,
    firms: FirmsClient,
}

impl Pipeline {
    /// Builds every client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if any HTTP client cannot be constructed or a
    /// configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, BuildError> {
        let fetcher = PostFetcher::new(config.request_timeout_secs, &config.user_agent)?;
        let extractor = LocationExtractor::new(
            &config.ollama_url,
            &config.model,
            config.prompt_path.clone(),
            config.inference_timeout_secs,
        )?;
        let geocoder = Geocoder::with_base_url(
            &config.geocoder_user_agent,
            config.request_timeout_secs,
            &config.nominatim_url,
        )?;
        let firms = FirmsClient::with_base_url(
            &config.firms_api_key,
            config.request_timeout_secs,
            &config.firms_url,
        )?;

        Ok(Self::from_parts(fetcher, extractor, geocoder, firms))
    }

    #[must_use]
    pub fn from_parts(
        fetcher: PostFetcher,
        extractor: LocationExtractor,
        geocoder: Geocoder,
        firms: FirmsClient,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            geocoder,
            firms,
        }
    }

    /// Runs every stage once for `request`.
    ///
    /// Never returns an error: the first failing stage halts the run and is
    /// recorded as [`RunStatus::Failed`] in the result, together with the
    /// entities produced before it.
    pub async fn run<O>(
        &self,
        request: &RunRequest,
        version: u64,
        mut observer: O,
    ) -> PipelineResult
    where
        O: FnMut(Progress),
    {
        tracing::info!(reference = %request.reference, version, "run started");

        let mut draft = RunDraft::new(&request.reference);
        let status = self.advance(request, &mut draft, &mut observer).await;

        match &status {
            RunStatus::Located => tracing::info!(version, "run finished with a location"),
            RunStatus::NoLocation { reason } => {
                tracing::info!(version, reason = %reason, "run finished without a location");
            }
            RunStatus::Failed(failure) => tracing::warn!(
                version,
                stage = %failure.stage,
                kind = ?failure.kind,
                error = %failure.message,
                "run failed"
            ),
        }

        observer(Progress::Percent(if status.is_failure() { 0 } else { 100 }));
        draft.finish(status, version)
    }

    async fn advance<O>(
        &self,
        request: &RunRequest,
        draft: &mut RunDraft,
        observer: &mut O,
    ) -> RunStatus
    where
        O: FnMut(Progress),
    {
        observer(Progress::StageStarted(Stage::Fetching));
        let text = match self.fetcher.fetch_str(&request.reference).await {
            Ok(text) => text,
            Err(e) => return failed(Stage::Fetching, e.kind(), &e),
        };
        let body = match &text {
            PostText::Body(body) => body.clone(),
            PostText::Empty => {
                draft.post_text = Some(text);
                return RunStatus::NoLocation {
                    reason: NoLocationReason::EmptyPost,
                };
            }
        };
        draft.post_text = Some(text);
        observer(Progress::Percent(33));

        observer(Progress::StageStarted(Stage::Extracting));
        let guess = match self.extractor.extract(&body).await {
            Ok(guess) => guess,
            Err(e) => return failed(Stage::Extracting, e.kind(), &e),
        };
        let place_name = guess.place_name().map(str::to_owned);
        draft.guess = Some(guess);
        let Some(place_name) = place_name else {
            return RunStatus::NoLocation {
                reason: NoLocationReason::ModelFoundNothing,
            };
        };

        observer(Progress::StageStarted(Stage::Geocoding));
        let place = match self.geocoder.geocode(&place_name).await {
            Ok(GeocodeOutcome::Found(place)) => place,
            Ok(GeocodeOutcome::NotFound) => {
                return RunStatus::NoLocation {
                    reason: NoLocationReason::Unresolved,
                }
            }
            Err(e) => return failed(Stage::Geocoding, e.kind(), &e),
        };
        let coordinate = place.coordinate;
        draft.place = Some(place);
        observer(Progress::Percent(66));

        if request.fetch_fires {
            observer(Progress::StageStarted(Stage::FetchingFires));
            let fires = self
                .firms
                .fetch_nearby(coordinate, request.radius_km, request.day_range)
                .await;
            draft.fires = Some(fires);
        }

        RunStatus::Located
    }
}

fn failed(stage: Stage, kind: FailureKind, error: &impl Display) -> RunStatus {
    RunStatus::Failed(StageFailure {
        stage,
        kind,
        message: error.to_string(),
    })
}
