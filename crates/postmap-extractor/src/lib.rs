//! Location extractor: asks a chat model which place a post is about.
//!
//! Talks to an Ollama-compatible `/api/chat` endpoint with JSON output mode
//! and turns the reply into a [`postmap_core::LocationGuess`].

pub mod client;
pub mod error;
mod types;

pub use client::LocationExtractor;
pub use error::ExtractError;
