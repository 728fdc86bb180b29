//! Profile metadata publication.

use nostr_sdk::prelude::*;
use tracing::info;

use crate::Error;

/// Public identity attached to the signer's key. Replaced wholesale on every
/// update; relays keep only the newest metadata event per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMetadata {
    pub name: String,
    pub about: String,
}

impl ProfileMetadata {
    pub fn new(name: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
        }
    }
}

/// Replace the signer's profile on every connected relay.
///
/// Standalone callers see the error; the publish orchestrator invokes this
/// best-effort and only logs a failure.
pub async fn update_profile(
    client: &Client,
    profile: &ProfileMetadata,
) -> Result<EventId, Error> {
    let metadata = Metadata::new()
        .name(profile.name.clone())
        .about(profile.about.clone());
    let output = client.set_metadata(&metadata).await?;
    info!(event_id = %output.id(), "Profile metadata updated");
    Ok(*output.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_is_replaced_wholesale() {
        let first = ProfileMetadata::new("nstr-report", "daily summaries");
        let second = ProfileMetadata::new("nstr-report", "");

        // No merge semantics: an empty field stays empty.
        assert_ne!(first, second);
        assert!(second.about.is_empty());
    }
}
