//! nstr-report: fetch BNOC forum activity, summarize it, publish to Nostr.

mod cache;
mod config;
mod formatter;

use chrono::Utc;
use clap::Parser;
use forum_fetch::ForumClient;
use nostr_publish::{
    fetch_latest_note, public_key_bech32, public_key_hex, publish_note, ProfileMetadata,
    PublishOptions, QueryOptions, SignerCredentials,
};
use summarizer::{Summarizer, SummarizerConfig};
use tracing::{info, warn};

const PROFILE_NAME: &str = "nstr-report";
const PROFILE_BIO: &str = "NSTR - Nothing Significant to Report. Daily summaries of \
Bitcoin Network Operations Collective (bnoc.xyz) activity.";

/// Substring used to recognize our own summaries when querying relays.
const SUMMARY_MARKER: &str = "BNOC Daily Summary";

#[derive(Debug, Parser)]
#[command(name = "nstr-report")]
#[command(about = "Fetch BNOC activity and publish to Nostr")]
struct Args {
    /// Print the message without publishing to Nostr
    #[arg(long)]
    dry_run: bool,

    /// Update the Nostr profile metadata
    #[arg(long)]
    update_profile: bool,

    /// Show configuration and exit
    #[arg(long)]
    show_config: bool,

    /// Repost the cached daily summary (don't fetch new data)
    #[arg(long)]
    repost: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let cfg = config::load()?;

    if args.show_config {
        show_config(&cfg);
        return Ok(());
    }

    let credentials = match SignerCredentials::from_parts(
        cfg.private_key.clone(),
        cfg.bunker_uri.clone(),
        cfg.app_key.clone(),
    ) {
        Ok(credentials) => credentials,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Edit {} and add either:", config::config_path_display());
            eprintln!("  \"bunker_uri\": \"bunker://...\" (recommended)");
            eprintln!("  \"private_key_hex\": \"...\"");
            std::process::exit(1);
        }
    };

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let mut summarizer_error = None;

    let message = if args.repost {
        match repost_message(&cfg, &today).await {
            Ok(message) => message,
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
    } else {
        info!(source = %cfg.source_url, "Fetching forum activity");
        let client = ForumClient::new(&cfg.source_url)?;
        let activity = match client.fetch_activity(cfg.lookback_hours).await {
            Ok(activity) => activity,
            Err(err) => {
                eprintln!("Error fetching activity: {err}");
                std::process::exit(1);
            }
        };
        info!(topics = activity.topics.len(), "Found topics with activity");

        let summarizer = cfg.anthropic_api_key.as_ref().and_then(|key| {
            match Summarizer::new(SummarizerConfig::new(key)) {
                Ok(summarizer) => Some(summarizer),
                Err(err) => {
                    warn!(error = %err, "Summarizer unavailable");
                    None
                }
            }
        });

        let report = formatter::format_activity(&activity, summarizer.as_ref()).await;
        summarizer_error = report.summarizer_error;
        report.message
    };

    if args.dry_run {
        println!("\n--- Message (dry run) ---");
        println!("{message}");
        if let Some(error) = &summarizer_error {
            println!("\n--- Summarizer failed - would also post: ---");
            println!("{}", formatter::failure_notice(error));
        }
        println!("--- End message ---\n");
        return Ok(());
    }

    if !args.repost {
        match cache::save(&message, &today) {
            Ok(()) => info!(date = %today, "Saved summary to cache"),
            Err(err) => warn!(error = %err, "Could not cache summary"),
        }
    }

    info!(relays = cfg.relays.len(), "Publishing to relays");
    let options = PublishOptions {
        profile: args
            .update_profile
            .then(|| ProfileMetadata::new(PROFILE_NAME, PROFILE_BIO)),
        ..PublishOptions::default()
    };

    match publish_note(&message, &cfg.relays, &credentials, &options).await {
        Ok(event_id) => {
            println!("Published! Event ID: {}", event_id.to_hex());
            if let Some(key) = &cfg.private_key {
                if let Ok(npub) = public_key_bech32(key) {
                    println!("View at: https://njump.me/{npub}");
                }
            }
            if let Err(err) = cache::record_post(&Utc::now().to_rfc3339()) {
                warn!(error = %err, "Could not record post time");
            }
            if let Some(error) = summarizer_error {
                publish_failure_notice(&error, &cfg, &credentials).await;
            }
        }
        Err(err) => {
            eprintln!("Error publishing to Nostr: {err}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Resolve the message to repost: today's cache, else the newest summary any
/// relay still has. Never touches the fetch or summarize paths.
async fn repost_message(
    cfg: &config::Config,
    today: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(cached) = cache::load() {
        if cached.date == today {
            info!(date = %cached.date, "Reposting cached summary");
            return Ok(cached.message);
        }
    }

    info!("Cache miss or stale, querying relays for the latest summary");
    let key = cfg.private_key.as_ref().ok_or(
        "no cached summary and cannot query relays without a local key; run without --repost",
    )?;
    let author = public_key_hex(key)?;

    let found = fetch_latest_note(
        &author,
        &cfg.relays,
        Some(SUMMARY_MARKER),
        &QueryOptions::default(),
    )
    .await?;

    match found {
        Some(message) => {
            if let Err(err) = cache::save(&message, today) {
                warn!(error = %err, "Could not cache summary");
            }
            Ok(message)
        }
        None => Err("no summary found on the relays; run without --repost to generate one".into()),
    }
}

/// Best-effort: a failed summary gets its own note so followers know the
/// listing was unsummarized. Never affects the primary publish result.
async fn publish_failure_notice(
    error: &str,
    cfg: &config::Config,
    credentials: &SignerCredentials,
) {
    info!("Summarizer failed, posting failure notification");
    let notice = formatter::failure_notice(error);
    match publish_note(&notice, &cfg.relays, credentials, &PublishOptions::default()).await {
        Ok(event_id) => {
            println!("Failure notification posted! Event ID: {}", event_id.to_hex());
        }
        Err(err) => warn!(error = %err, "Could not post failure notification"),
    }
}

fn show_config(cfg: &config::Config) {
    println!("Config file: {}", config::config_path_display());
    println!(
        "Cache file: {}",
        cache::cache_path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );

    if let Some(uri) = &cfg.bunker_uri {
        println!("Signer: Remote (NIP-46 bunker)");
        let shown: String = uri.chars().take(50).collect();
        println!("Bunker URI: {shown}...");
    } else if let Some(key) = &cfg.private_key {
        println!("Signer: Local keys");
        match public_key_bech32(key) {
            Ok(npub) => println!("Public key: {npub}"),
            Err(err) => println!("Public key: invalid ({err})"),
        }
    } else {
        println!("Signer: NOT CONFIGURED");
        println!("  Add 'bunker_uri' or 'private_key_hex' to the config");
    }

    println!("Source URL: {}", cfg.source_url);
    println!("Lookback hours: {}", cfg.lookback_hours);
    println!("Relays: {}", cfg.relays.join(", "));
    println!(
        "Anthropic API key: {}",
        if cfg.anthropic_api_key.is_some() {
            "set"
        } else {
            "not set"
        }
    );

    match cache::load() {
        Some(cache) => {
            println!("Cached summary date: {}", cache.date);
            println!("Times posted: {}", cache.posted_at.len());
        }
        None => println!("Cached summary: none"),
    }
}
