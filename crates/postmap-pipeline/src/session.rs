//! Interactive session state.

use postmap_core::PipelineResult;

use crate::pipeline::{Pipeline, Progress, RunRequest};

/// Holds at most one result: the latest run's.
///
/// A new run replaces the previous result wholesale; nothing from an
/// earlier run (coordinate, fires) survives into the next one, even when the
/// next one fails early. `run` takes `&mut self`, so one session cannot have
/// two runs in flight.
pub struct Session {
    pipeline: Pipeline,
    current: Option<PipelineResult>,
    runs: u64,
}

impl Session {
    #[must_use]
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            current: None,
            runs: 0,
        }
    }

    /// Runs the pipeline and stores its result as the current one.
    pub async fn run<O>(&mut self, request: &RunRequest, observer: O) -> &PipelineResult
    where
        O: FnMut(Progress),
    {
        self.current = None;
        self.runs += 1;
        let result = self.pipeline.run(request, self.runs, observer).await;
        self.current.insert(result)
    }

    /// The latest result, if any run has happened.
    #[must_use]
    pub fn current(&self) -> Option<&PipelineResult> {
        self.current.as_ref()
    }

    /// Number of runs started in this session.
    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs
    }
}
