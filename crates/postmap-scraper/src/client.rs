//! HTTP client for public post preview pages.

use std::time::Duration;

use postmap_core::{PostReference, PostText};
use reqwest::Client;

use crate::error::PostError;
use crate::normalize::clean_post_text;
use crate::parse::extract_og_description;

const DEFAULT_BASE_URL: &str = "https://t.me";

/// Fetches post pages and extracts their preview text.
///
/// Use [`PostFetcher::new`] for production or [`PostFetcher::with_base_url`]
/// to point at a mock server in tests. The base URL replaces only the scheme
/// and host; the `/<channel>/<id>` path always comes from the reference.
pub struct PostFetcher {
    client: Client,
    base_url: String,
}

impl PostFetcher {
    /// Creates a fetcher with the given timeout and `User-Agent`.
    ///
    /// The user agent should look like a desktop browser; bot-looking agents
    /// get served pages without preview tags.
    ///
    /// # Errors
    ///
    /// Returns [`PostError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, PostError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a fetcher with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PostError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PostError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(PostError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Validates raw user input, then fetches it.
    ///
    /// # Errors
    ///
    /// [`PostError::InvalidReference`] without touching the network when the
    /// input is not a public post address; otherwise as [`PostFetcher::fetch`].
    pub async fn fetch_str(&self, input: &str) -> Result<PostText, PostError> {
        let reference = PostReference::parse(input)?;
        self.fetch(&reference).await
    }

    /// Fetches the post page once and returns its cleaned body text.
    ///
    /// A page whose preview tag is present but blank yields
    /// [`PostText::Empty`], which is a success.
    ///
    /// # Errors
    ///
    /// - [`PostError::Http`] on network failure or timeout.
    /// - [`PostError::UnexpectedStatus`] on any non-2xx status.
    /// - [`PostError::NoPreviewData`] when the page has no `og:description` tag.
    pub async fn fetch(&self, reference: &PostReference) -> Result<PostText, PostError> {
        let url = self.post_url(reference);
        tracing::debug!(url = %url, "fetching post page");

        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|source| PostError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PostError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let html = response.text().await.map_err(|source| PostError::Http {
            url: url.clone(),
            source,
        })?;

        let Some(description) = extract_og_description(&html) else {
            tracing::warn!(url = %url, "page has no og:description tag");
            return Err(PostError::NoPreviewData { url });
        };

        if description.trim().is_empty() {
            tracing::info!(url = %url, "og:description tag is empty");
            return Ok(PostText::Empty);
        }

        let cleaned = clean_post_text(&description);
        if cleaned.is_empty() {
            tracing::info!(url = %url, "post text was only a channel handle");
            return Ok(PostText::Empty);
        }

        tracing::info!(url = %url, chars = cleaned.chars().count(), "extracted post text");
        Ok(PostText::Body(cleaned))
    }

    fn post_url(&self, reference: &PostReference) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            reference.channel(),
            reference.post_id()
        )
    }
}
