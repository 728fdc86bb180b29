//! Nostr publish pipeline for nstr-report.
//!
//! This crate owns everything between "here is the report text" and "a relay
//! accepted the signed note": acquiring a signing capability (local keys or a
//! NIP-46 bunker session), connecting a set of relays for the duration of one
//! operation, broadcasting with quorum-of-one acceptance, and retrying the
//! whole cycle with a fixed backoff when no relay accepts.
//!
//! # Write path
//!
//! ```rust,ignore
//! use nostr_publish::{publish_note, PublishOptions, SignerCredentials};
//!
//! let credentials = SignerCredentials::from_parts(Some(secret_key), None, None)?;
//! let event_id = publish_note(
//!     "hello nostr",
//!     &["wss://relay.damus.io".to_string()],
//!     &credentials,
//!     &PublishOptions::default(),
//! )
//! .await?;
//! ```
//!
//! # Read path
//!
//! [`fetch_latest_note`] queries the same relay set for the newest note by a
//! given author, used by the repost fallback. Absence of a match is `Ok(None)`,
//! not an error.
//!
//! Relay connections and signer sessions never outlive a single call; every
//! path that connects disconnects, including error paths.

mod error;
mod profile;
mod publish;
mod query;
mod relay;
mod signer;

pub use error::Error;
pub use profile::{update_profile, ProfileMetadata};
pub use publish::{publish_note, BroadcastReport, PublishOptions, MAX_RETRIES, RETRY_DELAY};
pub use query::{fetch_latest_note, QueryOptions};
pub use relay::RelaySet;
pub use signer::{acquire_signer, public_key_bech32, public_key_hex, SignerCredentials};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
