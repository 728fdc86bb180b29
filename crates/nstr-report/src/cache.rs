//! Daily summary cache backing the repost fallback.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Cached daily summary plus the times it has been posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryCache {
    pub message: String,
    pub date: String,
    #[serde(default)]
    pub posted_at: Vec<String>,
}

pub fn cache_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.cache_dir().join("nstr-report").join("daily.json"))
}

fn resolved_path() -> io::Result<PathBuf> {
    cache_path().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))
}

/// Load the cached summary; missing or unreadable caches are `None`.
pub fn load() -> Option<SummaryCache> {
    load_from(&resolved_path().ok()?)
}

fn load_from(path: &Path) -> Option<SummaryCache> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(cache) => Some(cache),
        Err(err) => {
            warn!(error = %err, "Ignoring unreadable summary cache");
            None
        }
    }
}

/// Replace the cached summary for `date`.
pub fn save(message: &str, date: &str) -> io::Result<()> {
    save_to(
        &resolved_path()?,
        &SummaryCache {
            message: message.to_string(),
            date: date.to_string(),
            posted_at: Vec::new(),
        },
    )
}

fn save_to(path: &Path, cache: &SummaryCache) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(cache)?)
}

/// Record that the cached summary was posted at `timestamp`.
pub fn record_post(timestamp: &str) -> io::Result<()> {
    let path = resolved_path()?;
    if let Some(mut cache) = load_from(&path) {
        cache.posted_at.push(timestamp.to_string());
        save_to(&path, &cache)?;
    }
    Ok(())
}
