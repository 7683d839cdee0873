//! Post fetcher: turns a public Telegram post address into its body text.
//!
//! The text comes from the page's `og:description` preview tag, which holds the
//! full post body for link previews.

pub mod client;
pub mod error;
pub mod normalize;
pub mod parse;

pub use client::PostFetcher;
pub use error::PostError;
pub use normalize::clean_post_text;
pub use parse::extract_og_description;
