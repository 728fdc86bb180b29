//! HTTP client for the Discourse endpoints.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{debug, info};

use crate::api::{LatestResponse, TopicResponse};
use crate::types::{Activity, Post, Topic};
use crate::Error;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one Discourse forum instance.
#[derive(Debug, Clone)]
pub struct ForumClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForumClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch all topics bumped within the lookback window, with their new
    /// posts, newest activity first.
    pub async fn fetch_activity(&self, lookback_hours: u64) -> Result<Activity, Error> {
        let cutoff = Utc::now() - ChronoDuration::hours(lookback_hours as i64);

        let latest: LatestResponse = self
            .http
            .get(format!("{}/latest.json", self.base_url))
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let users: HashMap<u64, String> = latest
            .users
            .into_iter()
            .map(|user| (user.id, user.username))
            .collect();

        let mut topics = Vec::new();
        for summary in latest.topic_list.topics {
            let bumped_at = parse_timestamp(&summary.bumped_at)?;
            if bumped_at < cutoff {
                continue;
            }

            // Discourse flags the original poster in the poster descriptions.
            let author = summary
                .posters
                .iter()
                .find(|poster| poster.description.contains("Original Poster"))
                .and_then(|poster| users.get(&poster.user_id))
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());

            let posts = self
                .fetch_topic_posts(summary.id, &summary.slug, cutoff)
                .await?;

            topics.push(Topic {
                id: summary.id,
                title: summary.title,
                url: format!("{}/t/{}/{}", self.base_url, summary.slug, summary.id),
                slug: summary.slug,
                author,
                posts_count: summary.posts_count,
                last_posted_at: parse_timestamp(&summary.last_posted_at)?,
                bumped_at,
                created_at: parse_timestamp(&summary.created_at)?,
                tags: summary.tags,
                posts,
            });
        }

        topics.sort_by(|a, b| b.bumped_at.cmp(&a.bumped_at));
        info!(topics = topics.len(), "Fetched forum activity");

        Ok(Activity {
            topics,
            fetched_at: Utc::now(),
            source_url: self.base_url.clone(),
        })
    }

    /// Posts in one topic created after `since`.
    async fn fetch_topic_posts(
        &self,
        topic_id: u64,
        slug: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Post>, Error> {
        let response: TopicResponse = self
            .http
            .get(format!("{}/t/{}/{}.json", self.base_url, slug, topic_id))
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut posts = Vec::new();
        for data in response.post_stream.posts {
            let created_at = parse_timestamp(&data.created_at)?;
            if created_at < since {
                continue;
            }
            posts.push(Post {
                id: data.id,
                author: data.username,
                content: html_to_text(&data.cooked)?,
                created_at,
                post_number: data.post_number,
            });
        }
        debug!(topic_id, posts = posts.len(), "Fetched topic posts");
        Ok(posts)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, Error> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

/// Convert cooked Discourse HTML to a single line of plain text, keeping
/// image alt text so image-only posts still carry some signal.
pub fn html_to_text(html: &str) -> Result<String, Error> {
    let html = preserve_image_alts(html);
    let text = html2text::config::plain()
        .string_from_read(html.as_bytes(), 80)
        .map_err(|err| Error::Html(err.to_string()))?;
    Ok(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Replace `<img ... alt="...">` tags with their bracketed alt text before
/// the markup is stripped.
fn preserve_image_alts(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find("<img") {
        out.push_str(&rest[..start]);
        let tag_rest = &rest[start..];
        let Some(end) = tag_rest.find('>') else {
            out.push_str(tag_rest);
            return out;
        };
        if let Some(alt) = extract_attr(&tag_rest[..=end], "alt") {
            if !alt.is_empty() {
                out.push('[');
                out.push_str(&alt);
                out.push(']');
            }
        }
        rest = &tag_rest[end + 1..];
    }

    out.push_str(rest);
    out
}

fn extract_attr(tag: &str, name: &str) -> Option<String> {
    let marker = format!("{name}=\"");
    let start = tag.find(&marker)? + marker.len();
    let end = tag[start..].find('"')? + start;
    Some(tag[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_markup() {
        let text = html_to_text("<p>Seeing <strong>odd</strong> fee spikes.</p>").unwrap();
        assert_eq!(text, "Seeing odd fee spikes.");
    }

    #[test]
    fn test_html_to_text_normalizes_whitespace() {
        let text = html_to_text("<p>one</p>\n<p>two</p>\n\n<p>three</p>").unwrap();
        assert_eq!(text, "one two three");
    }

    #[test]
    fn test_image_alt_is_preserved() {
        let text =
            html_to_text(r#"<p>chart: <img src="/up.png" alt="fee rate graph"></p>"#).unwrap();
        assert!(text.contains("[fee rate graph]"));
    }

    #[test]
    fn test_image_without_alt_is_dropped() {
        let text = html_to_text(r#"<p>before <img src="/up.png"> after</p>"#).unwrap();
        assert_eq!(text, "before after");
    }

    #[test]
    fn test_parse_timestamp_discourse_format() {
        let parsed = parse_timestamp("2024-05-01T22:30:00.000Z").unwrap();
        assert_eq!(parsed.timestamp(), 1_714_602_600);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ForumClient::new("https://bnoc.xyz/").unwrap();
        assert_eq!(client.base_url, "https://bnoc.xyz");
    }
}
