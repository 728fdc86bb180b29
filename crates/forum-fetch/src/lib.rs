//! Discourse forum activity fetcher.
//!
//! Reads the two JSON endpoints a Discourse instance exposes without
//! authentication, `/latest.json` for the topic list and
//! `/t/{slug}/{id}.json` for each topic's post stream, and turns them into
//! an [`Activity`]: topics bumped within a lookback window, each carrying its
//! new posts as plain text, newest activity first.

mod api;
mod client;
mod error;
mod types;

pub use client::{html_to_text, ForumClient};
pub use error::Error;
pub use types::{Activity, Post, Topic};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
