//! Relay connection set, scoped to a single publish or query call.

use std::sync::Arc;
use std::time::Duration;

use nostr_sdk::prelude::*;
use tracing::{debug, warn};

use crate::Error;

/// The relay connections backing one operation.
///
/// Connections are initiated concurrently by the underlying pool; endpoints
/// that fail to connect simply stay out of the broadcast target set. Callers
/// hand the set back via [`RelaySet::disconnect`] on every exit path; there
/// is no pooling or reuse across operations.
pub struct RelaySet {
    client: Client,
}

impl RelaySet {
    /// Resolve and connect `relays`, then wait out the settling period so the
    /// asynchronous handshakes have a chance to finish before the set is used.
    ///
    /// Invalid URLs are logged and skipped; only an entirely unusable list is
    /// an error.
    pub async fn connect(
        signer: Option<Arc<dyn NostrSigner>>,
        relays: &[String],
        settle_delay: Duration,
    ) -> Result<Self, Error> {
        let client = match signer {
            Some(signer) => Client::builder().signer(signer).build(),
            None => Client::default(),
        };

        let mut usable = 0usize;
        for url in relays {
            match client.add_relay(url).await {
                Ok(_) => usable += 1,
                Err(err) => warn!(relay = %url, error = %err, "Skipping relay"),
            }
        }
        if usable == 0 {
            return Err(Error::NoRelays);
        }

        client.connect().await;
        tokio::time::sleep(settle_delay).await;
        debug!(relays = usable, "Relay set connected");

        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Release every endpoint connection.
    pub async fn disconnect(self) {
        self.client.disconnect().await;
    }
}
