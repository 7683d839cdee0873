//! Post references and the text extracted from them.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Suffix Telegram appends when a post is opened in single-item view.
const SINGLE_VIEW_SUFFIX: &str = "?single";

static POST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://t\.me/([\w_]+)/(\d+)$").expect("valid post url regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid post reference \"{input}\": expected https://t.me/<channel>/<post id>")]
pub struct ReferenceError {
    pub input: String,
}

/// A validated public post address (`https://t.me/<channel>/<id>`).
///
/// The only way to obtain one is [`PostReference::parse`], so holding a value
/// means the shape check already passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostReference {
    url: String,
    channel: String,
    post_id: String,
}

impl PostReference {
    /// Normalize and validate user input.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError`] when the normalized input is not a public
    /// post address.
    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        let normalized = normalize_reference(input);
        let caps = POST_URL_RE.captures(normalized).ok_or_else(|| ReferenceError {
            input: input.to_owned(),
        })?;

        Ok(Self {
            url: normalized.to_owned(),
            channel: caps[1].to_owned(),
            post_id: caps[2].to_owned(),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn post_id(&self) -> &str {
        &self.post_id
    }
}

impl fmt::Display for PostReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Trim surrounding whitespace and strip one trailing `?single` suffix.
#[must_use]
pub fn normalize_reference(input: &str) -> &str {
    let trimmed = input.trim();
    match trimmed.strip_suffix(SINGLE_VIEW_SUFFIX) {
        Some(stripped) => {
            tracing::debug!(url = stripped, "removed single-view suffix from post URL");
            stripped
        }
        None => trimmed,
    }
}

/// Body text of a post.
///
/// `Empty` is a successful fetch of a post that carries no text (photo-only
/// posts, for instance). It is not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum PostText {
    Body(String),
    Empty,
}

impl PostText {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PostText::Body(text) => text,
            PostText::Empty => "",
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, PostText::Empty)
    }
}
