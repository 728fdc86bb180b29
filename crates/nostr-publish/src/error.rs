use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("nostr client error: {0}")]
    NostrClient(#[from] nostr_sdk::client::Error),
    #[error("nostr key error: {0}")]
    NostrKey(#[from] nostr_sdk::nostr::key::Error),
    #[error("nostr signer error: {0}")]
    Signer(#[from] nostr_sdk::nostr::signer::SignerError),
    #[error("nostr connect error: {0}")]
    Connect(#[from] nostr_connect::error::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("remote signer did not respond in time")]
    SigningTimeout,
    #[error("no usable relay endpoints")]
    NoRelays,
    #[error("operation timed out")]
    Timeout,
    #[error("publish failed after {attempts} attempts: {reason}")]
    Publish { attempts: u32, reason: String },
}
