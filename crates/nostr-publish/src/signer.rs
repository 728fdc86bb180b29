//! Signing capability acquisition: local keys or a NIP-46 bunker session.

use std::sync::Arc;
use std::time::Duration;

use nostr_connect::client::NostrConnect;
use nostr_sdk::prelude::*;
use tracing::debug;

use crate::Error;

/// How events get signed: a local secret key, or a remote signer reached
/// through a `bunker://` URI. Exactly one mode is active; in remote mode the
/// delegated private key never enters this process.
#[derive(Debug, Clone)]
pub enum SignerCredentials {
    /// Local signing with raw key material (hex or bech32 `nsec`).
    Keys { secret_key: String },
    /// Remote delegated signing over NIP-46. The app key is the local session
    /// keypair identifying this client to the bunker; a fresh one is
    /// generated when not supplied.
    Bunker {
        uri: String,
        app_key: Option<String>,
    },
}

impl SignerCredentials {
    /// Build credentials from optional config fields. The bunker takes
    /// precedence when both are configured.
    pub fn from_parts(
        secret_key: Option<String>,
        bunker_uri: Option<String>,
        app_key: Option<String>,
    ) -> Result<Self, Error> {
        if let Some(uri) = bunker_uri {
            Ok(Self::Bunker { uri, app_key })
        } else if let Some(secret_key) = secret_key {
            Ok(Self::Keys { secret_key })
        } else {
            Err(Error::Configuration(
                "no signing method configured".to_string(),
            ))
        }
    }
}

/// Acquire a signer for one publish operation.
///
/// Remote sessions are established eagerly, bounded by `timeout`, so an
/// unreachable bunker fails here instead of stalling the broadcast.
pub async fn acquire_signer(
    credentials: &SignerCredentials,
    timeout: Duration,
) -> Result<Arc<dyn NostrSigner>, Error> {
    match credentials {
        SignerCredentials::Keys { secret_key } => {
            let keys = Keys::parse(secret_key)?;
            Ok(Arc::new(keys))
        }
        SignerCredentials::Bunker { uri, app_key } => {
            let uri = NostrConnectURI::parse(uri)
                .map_err(|e| Error::Configuration(format!("invalid bunker uri: {e}")))?;
            let app_keys = match app_key {
                Some(key) => Keys::parse(key)?,
                None => Keys::generate(),
            };

            let connect = NostrConnect::new(uri, app_keys, timeout, None)?;
            let public_key = tokio::time::timeout(timeout, connect.get_public_key())
                .await
                .map_err(|_| Error::SigningTimeout)??;
            debug!(signer = %public_key, "Remote signer session established");

            Ok(Arc::new(connect))
        }
    }
}

/// Bech32 (`npub`) form of the public key behind a local secret key.
pub fn public_key_bech32(secret_key: &str) -> Result<String, Error> {
    let keys = Keys::parse(secret_key)?;
    let public_key = keys.public_key();
    Ok(public_key
        .to_bech32()
        .unwrap_or_else(|_| public_key.to_hex()))
}

/// Hex form of the public key behind a local secret key.
pub fn public_key_hex(secret_key: &str) -> Result<String, Error> {
    let keys = Keys::parse(secret_key)?;
    Ok(keys.public_key().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_requires_a_method() {
        let result = SignerCredentials::from_parts(None, None, None);
        match result {
            Err(Error::Configuration(msg)) => {
                assert!(msg.contains("no signing method"));
            }
            _ => panic!("Expected Configuration error"),
        }
    }

    #[test]
    fn test_from_parts_prefers_bunker() {
        let credentials = SignerCredentials::from_parts(
            Some("abcd".to_string()),
            Some("bunker://pubkey?relay=wss%3A%2F%2Frelay.example".to_string()),
            None,
        )
        .unwrap();

        assert!(matches!(credentials, SignerCredentials::Bunker { .. }));
    }

    #[test]
    fn test_from_parts_falls_back_to_keys() {
        let credentials =
            SignerCredentials::from_parts(Some("abcd".to_string()), None, None).unwrap();
        assert!(matches!(credentials, SignerCredentials::Keys { .. }));
    }

    #[tokio::test]
    async fn test_acquire_local_signer() {
        let keys = Keys::generate();
        let secret = keys.secret_key().to_secret_hex();

        let credentials = SignerCredentials::Keys { secret_key: secret };
        let signer = acquire_signer(&credentials, Duration::from_secs(1))
            .await
            .unwrap();

        let public_key = signer.get_public_key().await.unwrap();
        assert_eq!(public_key, keys.public_key());
    }

    #[test]
    fn test_public_key_formats_agree() {
        let keys = Keys::generate();
        let secret = keys.secret_key().to_secret_hex();

        let hex = public_key_hex(&secret).unwrap();
        let npub = public_key_bech32(&secret).unwrap();

        assert_eq!(hex, keys.public_key().to_hex());
        assert!(npub.starts_with("npub1"));
    }
}
