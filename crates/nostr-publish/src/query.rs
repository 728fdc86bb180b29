//! Query path: the newest matching note by an author, for the repost fallback.

use std::time::Duration;

use nostr_sdk::prelude::*;
use tracing::debug;

use crate::relay::RelaySet;
use crate::Error;

/// Knobs for one relay query.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub query_timeout: Duration,
    /// Wait after initiating relay connections before querying.
    pub settle_delay: Duration,
    /// How many notes to scan when a content filter is supplied.
    pub batch_limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(15),
            settle_delay: Duration::from_secs(2),
            batch_limit: 20,
        }
    }
}

/// Fetch the body of the newest text note by `public_key`; with `contains`,
/// the newest within a bounded batch whose body contains that substring.
///
/// `Ok(None)` means no connected relay returned a match, an expected outcome
/// distinct from a connection failure. The substring scan is a latency
/// tradeoff, not a search over full relay history.
pub async fn fetch_latest_note(
    public_key: &str,
    relays: &[String],
    contains: Option<&str>,
    options: &QueryOptions,
) -> Result<Option<String>, Error> {
    let author = PublicKey::parse(public_key)?;
    let set = RelaySet::connect(None, relays, options.settle_delay).await?;

    let limit = if contains.is_some() {
        options.batch_limit
    } else {
        1
    };
    let filter = Filter::new()
        .author(author)
        .kind(Kind::TextNote)
        .limit(limit);

    let result = set.client().fetch_events(filter, options.query_timeout).await;
    set.disconnect().await;
    let events = result?;

    let found = select_latest(events.into_iter().collect(), contains);
    debug!(found = found.is_some(), "Relay query finished");
    Ok(found)
}

/// Newest-first scan for the first body matching the filter.
fn select_latest(mut events: Vec<Event>, contains: Option<&str>) -> Option<String> {
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    events.into_iter().find_map(|event| match contains {
        Some(needle) if !event.content.contains(needle) => None,
        _ => Some(event.content),
    })
}
