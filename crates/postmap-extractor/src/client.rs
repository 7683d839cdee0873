//! HTTP client for the chat inference service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use postmap_core::{LocationGuess, LOCATION_NOT_FOUND, THINKING_NOT_FOUND};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ExtractError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, LocationAnswer};

/// Sends post text to a chat model and parses its location answer.
pub struct LocationExtractor {
    client: Client,
    chat_url: String,
    model: String,
    prompt_path: PathBuf,
}

impl LocationExtractor {
    /// Creates an extractor for the service at `base_url`
    /// (e.g. `http://localhost:11434`).
    ///
    /// The prompt file is read on every call, so edits take effect without a
    /// restart.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InferenceService`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        model: &str,
        prompt_path: impl Into<PathBuf>,
        timeout_secs: u64,
    ) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractError::InferenceService(format!("client build failed: {e}")))?;

        Ok(Self {
            client,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
            model: model.to_owned(),
            prompt_path: prompt_path.into(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn prompt_path(&self) -> &Path {
        &self.prompt_path
    }

    /// Reads the instruction template.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::PromptResourceMissing`] if the file cannot be read.
    pub fn load_prompt(&self) -> Result<String, ExtractError> {
        std::fs::read_to_string(&self.prompt_path).map_err(|source| {
            ExtractError::PromptResourceMissing {
                path: self.prompt_path.clone(),
                source,
            }
        })
    }

    /// Loads the prompt file and extracts a location from `text`.
    ///
    /// # Errors
    ///
    /// See [`LocationExtractor::load_prompt`] and
    /// [`LocationExtractor::extract_with_prompt`].
    pub async fn extract(&self, text: &str) -> Result<LocationGuess, ExtractError> {
        let instruction = self.load_prompt()?;
        self.extract_with_prompt(text, &instruction).await
    }

    /// Sends one system + user exchange and parses the reply.
    ///
    /// A reply without a `location` key is a valid guess of
    /// [`LOCATION_NOT_FOUND`], not an error.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::InferenceService`] on transport failure, non-2xx
    ///   status, or an envelope without `message.content`.
    /// - [`ExtractError::MalformedModelOutput`] when `message.content` is not
    ///   a JSON object of the expected shape.
    pub async fn extract_with_prompt(
        &self,
        text: &str,
        instruction: &str,
    ) -> Result<LocationGuess, ExtractError> {
        let request = ChatRequest {
            model: &self.model,
            format: "json",
            stream: false,
            messages: [
                ChatMessage {
                    role: "system",
                    content: instruction,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        tracing::debug!(model = %self.model, url = %self.chat_url, "sending chat request");

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractError::InferenceService(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::InferenceService(format!(
                "service returned status {status}: {}",
                body.trim()
            )));
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::InferenceService(format!("response parse error: {e}")))?;

        let guess = parse_reply(envelope, &self.model)?;
        tracing::info!(
            location = %guess.location,
            model = %guess.model,
            elapsed_secs = guess.elapsed_secs,
            "model answered"
        );
        Ok(guess)
    }
}

fn parse_reply(
    envelope: ChatResponse,
    requested_model: &str,
) -> Result<LocationGuess, ExtractError> {
    let ChatResponse {
        model,
        message,
        total_duration,
    } = envelope;

    // Go through a map first: a derived struct would also accept a JSON array.
    let parsed = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(
        &message.content,
    )
    .and_then(|object| LocationAnswer::deserialize(serde_json::Value::Object(object)));

    let answer = match parsed {
        Ok(answer) => answer,
        Err(source) => {
            return Err(ExtractError::MalformedModelOutput {
                raw: message.content,
                source,
            })
        }
    };

    Ok(LocationGuess {
        location: answer
            .location
            .unwrap_or_else(|| LOCATION_NOT_FOUND.to_string()),
        thinking: message
            .thinking
            .unwrap_or_else(|| THINKING_NOT_FOUND.to_string()),
        model: model.unwrap_or_else(|| requested_model.to_string()),
        elapsed_secs: nanos_to_secs(total_duration.unwrap_or(0)),
    })
}

/// Nanoseconds to seconds, rounded to millisecond precision.
fn nanos_to_secs(nanos: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let secs = nanos as f64 / 1e9;
    (secs * 1000.0).round() / 1000.0
}
