//! Activity types produced by the fetcher.

use chrono::{DateTime, Utc};

/// A post within a topic.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: u64,
    pub author: String,
    /// Plain-text content converted from the cooked HTML.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub post_number: u32,
}

/// A forum topic with recent activity.
#[derive(Debug, Clone)]
pub struct Topic {
    pub id: u64,
    pub title: String,
    pub slug: String,
    /// The original poster's username, or "unknown".
    pub author: String,
    pub posts_count: u32,
    pub last_posted_at: DateTime<Utc>,
    pub bumped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub url: String,
    /// Posts created within the lookback window.
    pub posts: Vec<Post>,
}

impl Topic {
    /// Whether the topic was created the same day as its last activity.
    pub fn is_new(&self) -> bool {
        self.created_at.date_naive() == self.bumped_at.date_naive()
    }
}

/// Recent activity pulled from the forum.
#[derive(Debug, Clone)]
pub struct Activity {
    pub topics: Vec<Topic>,
    pub fetched_at: DateTime<Utc>,
    pub source_url: String,
}

impl Activity {
    /// Total new posts across all topics.
    pub fn post_count(&self) -> usize {
        self.topics.iter().map(|topic| topic.posts.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn topic(created: DateTime<Utc>, bumped: DateTime<Utc>) -> Topic {
        Topic {
            id: 1,
            title: "Test".to_string(),
            slug: "test".to_string(),
            author: "alice".to_string(),
            posts_count: 1,
            last_posted_at: bumped,
            bumped_at: bumped,
            created_at: created,
            tags: Vec::new(),
            url: "https://forum.example/t/test/1".to_string(),
            posts: Vec::new(),
        }
    }

    #[test]
    fn test_is_new_same_day() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let bumped = Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap();
        assert!(topic(created, bumped).is_new());
    }

    #[test]
    fn test_is_new_old_topic_bumped() {
        let created = Utc.with_ymd_and_hms(2024, 4, 20, 8, 0, 0).unwrap();
        let bumped = Utc.with_ymd_and_hms(2024, 5, 1, 22, 30, 0).unwrap();
        assert!(!topic(created, bumped).is_new());
    }

    #[test]
    fn test_post_count_sums_topics() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut first = topic(created, created);
        let mut second = topic(created, created);
        let post = Post {
            id: 1,
            author: "bob".to_string(),
            content: "hi".to_string(),
            created_at: created,
            post_number: 1,
        };
        first.posts = vec![post.clone(), post.clone()];
        second.posts = vec![post];

        let activity = Activity {
            topics: vec![first, second],
            fetched_at: created,
            source_url: "https://forum.example".to_string(),
        };
        assert_eq!(activity.post_count(), 3);
    }
}
