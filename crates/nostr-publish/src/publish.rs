//! Publish orchestration: sign, broadcast, aggregate, retry.

use std::time::Duration;

use nostr_sdk::prelude::*;
use tracing::{info, warn};

use crate::profile::{self, ProfileMetadata};
use crate::relay::RelaySet;
use crate::signer::{acquire_signer, SignerCredentials};
use crate::Error;

/// Default number of publish attempts before giving up.
pub const MAX_RETRIES: u32 = 3;
/// Fixed delay between attempts.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Knobs for one publish operation.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Profile metadata pushed best-effort before the note goes out.
    pub profile: Option<ProfileMetadata>,
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Wait after initiating relay connections before broadcasting.
    pub settle_delay: Duration,
    /// Bound on remote-signer session establishment and approval.
    pub signer_timeout: Duration,
    /// Bound on the broadcast send/ack collection.
    pub send_timeout: Duration,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            profile: None,
            max_retries: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
            settle_delay: Duration::from_secs(2),
            signer_timeout: Duration::from_secs(60),
            send_timeout: Duration::from_secs(30),
        }
    }
}

/// Aggregated per-relay outcome of one broadcast attempt.
#[derive(Debug, Clone)]
pub struct BroadcastReport {
    pub event_id: EventId,
    /// Relays that acknowledged the event.
    pub accepted: usize,
    /// Relays that rejected it or never answered, with the pool's reason.
    pub rejected: Vec<(String, String)>,
}

impl BroadcastReport {
    fn from_output(output: Output<EventId>) -> Self {
        let rejected = output
            .failed
            .iter()
            .map(|(url, reason)| (url.to_string(), reason.clone()))
            .collect();
        Self {
            event_id: *output.id(),
            accepted: output.success.len(),
            rejected,
        }
    }

    /// One acknowledgement is enough; relay networks are lossy and partial
    /// failure is the normal case.
    pub fn is_accepted(&self) -> bool {
        self.accepted > 0
    }

    fn failure_reason(&self) -> String {
        format!("all {} relays rejected the event", self.rejected.len())
    }
}

/// Publish a text note, retrying the full cycle until one relay accepts.
///
/// Each attempt acquires a fresh signer and fresh relay connections, and
/// attempts run strictly in sequence. Missing credentials surface
/// immediately; every other failure counts against `options.max_retries`
/// before the terminal [`Error::Publish`] carries the last reason out.
pub async fn publish_note(
    content: &str,
    relays: &[String],
    credentials: &SignerCredentials,
    options: &PublishOptions,
) -> Result<EventId, Error> {
    let mut last_failure = String::from("no attempts made");

    for attempt in 1..=options.max_retries {
        match publish_once(content, relays, credentials, options).await {
            Ok(report) if report.is_accepted() => {
                info!(
                    event_id = %report.event_id,
                    accepted = report.accepted,
                    rejected = report.rejected.len(),
                    attempt,
                    "Published note"
                );
                return Ok(report.event_id);
            }
            Ok(report) => {
                for (relay, reason) in &report.rejected {
                    warn!(relay = %relay, reason = %reason, "Relay rejected event");
                }
                last_failure = report.failure_reason();
                warn!(attempt, "{last_failure}");
            }
            Err(Error::Configuration(reason)) => {
                return Err(Error::Configuration(reason));
            }
            Err(err) => {
                last_failure = err.to_string();
                warn!(attempt, error = %last_failure, "Publish attempt failed");
            }
        }

        if attempt < options.max_retries {
            tokio::time::sleep(options.retry_delay).await;
        }
    }

    Err(Error::Publish {
        attempts: options.max_retries,
        reason: last_failure,
    })
}

/// One full attempt: acquire signer, connect, optional profile push,
/// broadcast, disconnect.
async fn publish_once(
    content: &str,
    relays: &[String],
    credentials: &SignerCredentials,
    options: &PublishOptions,
) -> Result<BroadcastReport, Error> {
    let signer = acquire_signer(credentials, options.signer_timeout).await?;
    let set = RelaySet::connect(Some(signer), relays, options.settle_delay).await?;

    if let Some(metadata) = &options.profile {
        // Best-effort: a failed profile push never sinks the publish.
        if let Err(err) = profile::update_profile(set.client(), metadata).await {
            warn!(error = %err, "Profile update failed, continuing with publish");
        }
    }

    let builder = EventBuilder::text_note(content);
    let result = tokio::time::timeout(
        options.send_timeout,
        set.client().send_event_builder(builder),
    )
    .await;

    set.disconnect().await;

    let output = result.map_err(|_| Error::Timeout)??;
    Ok(BroadcastReport::from_output(output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(accepted: usize, rejected: usize) -> BroadcastReport {
        BroadcastReport {
            event_id: EventId::all_zeros(),
            accepted,
            rejected: (0..rejected)
                .map(|i| (format!("wss://relay{i}.example"), "error".to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_quorum_of_one() {
        assert!(report(1, 5).is_accepted());
        assert!(report(3, 0).is_accepted());
    }

    #[test]
    fn test_all_rejected_is_failure() {
        let report = report(0, 2);
        assert!(!report.is_accepted());
        assert_eq!(report.failure_reason(), "all 2 relays rejected the event");
    }

    #[test]
    fn test_no_connections_is_failure() {
        assert!(!report(0, 0).is_accepted());
    }

    #[test]
    fn test_default_options() {
        let options = PublishOptions::default();

        assert!(options.profile.is_none());
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.retry_delay, Duration::from_secs(5));
        assert_eq!(options.settle_delay, Duration::from_secs(2));
        assert_eq!(options.signer_timeout, Duration::from_secs(60));
        assert_eq!(options.send_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_event_id_is_deterministic() {
        // The id depends only on (author, timestamp, kind, body); a second
        // signature over the same preimage must produce the same id.
        let keys = Keys::generate();
        let created_at = Timestamp::from(1_700_000_000u64);

        let first = EventBuilder::text_note("hello")
            .custom_created_at(created_at)
            .sign_with_keys(&keys)
            .unwrap();
        let second = EventBuilder::text_note("hello")
            .custom_created_at(created_at)
            .sign_with_keys(&keys)
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.pubkey, second.pubkey);
    }

    #[test]
    fn test_event_id_tracks_content() {
        let keys = Keys::generate();
        let created_at = Timestamp::from(1_700_000_000u64);

        let first = EventBuilder::text_note("hello")
            .custom_created_at(created_at)
            .sign_with_keys(&keys)
            .unwrap();
        let second = EventBuilder::text_note("goodbye")
            .custom_created_at(created_at)
            .sign_with_keys(&keys)
            .unwrap();

        assert_ne!(first.id, second.id);
    }
}
