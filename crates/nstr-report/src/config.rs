//! Configuration dotfile handling.
//!
//! The config lives in a JSON dotfile at `~/.nstr-report`, created with
//! defaults on first run. The Anthropic key may come from the file or from
//! `ANTHROPIC_API_KEY`.

use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_RELAYS: [&str; 4] = [
    "wss://relay.damus.io",
    "wss://relay.primal.net",
    "wss://nos.lol",
    "wss://relay.bitcoindistrict.org",
];
pub const DEFAULT_SOURCE_URL: &str = "https://bnoc.xyz";
pub const DEFAULT_LOOKBACK_HOURS: u64 = 24;

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub relays: Vec<String>,
    pub source_url: String,
    pub lookback_hours: u64,
    pub anthropic_api_key: Option<String>,
    /// Local signing key, hex or bech32 `nsec`.
    pub private_key: Option<String>,
    pub bunker_uri: Option<String>,
    pub app_key: Option<String>,
}

/// On-disk layout of the dotfile.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    nostr: NostrSection,
    #[serde(default)]
    relays: Option<RelaySection>,
    #[serde(default)]
    source: Option<SourceSection>,
    #[serde(default)]
    anthropic: Option<AnthropicSection>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NostrSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    private_key_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nsec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bunker_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    app_key_hex: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RelaySection {
    #[serde(default)]
    urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SourceSection {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    lookback_hours: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicSection {
    #[serde(default)]
    api_key: Option<String>,
}

pub fn config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".nstr-report"))
}

pub fn config_path_display() -> String {
    config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "~/.nstr-report".to_string())
}

/// Load the config, creating a default dotfile on first run.
pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
    let path = config_path().ok_or("could not resolve home directory")?;

    if !path.exists() {
        let raw = serde_json::to_string_pretty(&ConfigFile {
            nostr: NostrSection::default(),
            relays: Some(RelaySection {
                urls: DEFAULT_RELAYS.iter().map(|url| url.to_string()).collect(),
            }),
            source: Some(SourceSection {
                url: Some(DEFAULT_SOURCE_URL.to_string()),
                lookback_hours: Some(DEFAULT_LOOKBACK_HOURS),
            }),
            anthropic: None,
        })?;
        fs::write(&path, raw)?;
        restrict_permissions(&path)?;
        info!(path = %path.display(), "Created new config");
        println!("Created new config at {}", path.display());
        println!("Configure either bunker_uri (recommended) or private_key_hex in the config file");
    }

    let raw = fs::read_to_string(&path)?;
    Ok(parse(&raw)?)
}

/// Parse the dotfile contents into a resolved [`Config`].
fn parse(raw: &str) -> Result<Config, serde_json::Error> {
    let file: ConfigFile = serde_json::from_str(raw)?;

    // Both key spellings are accepted; Keys::parse handles hex and nsec.
    let private_key = file.nostr.private_key_hex.or(file.nostr.nsec);

    let anthropic_api_key = file
        .anthropic
        .and_then(|section| section.api_key)
        .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok());

    let (source_url, lookback_hours) = match file.source {
        Some(section) => (
            section
                .url
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            section.lookback_hours.unwrap_or(DEFAULT_LOOKBACK_HOURS),
        ),
        None => (DEFAULT_SOURCE_URL.to_string(), DEFAULT_LOOKBACK_HOURS),
    };

    let relays = match file.relays {
        Some(section) if !section.urls.is_empty() => section.urls,
        _ => DEFAULT_RELAYS.iter().map(|url| url.to_string()).collect(),
    };

    Ok(Config {
        relays,
        source_url,
        lookback_hours,
        anthropic_api_key,
        private_key,
        bunker_uri: file.nostr.bunker_uri,
        app_key: file.nostr.app_key_hex,
    })
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> std::io::Result<()> {
    Ok(())
}
