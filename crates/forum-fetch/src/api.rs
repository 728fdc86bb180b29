//! Discourse JSON wire types for the two endpoints we read.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct LatestResponse {
    #[serde(default)]
    pub users: Vec<UserSummary>,
    pub topic_list: TopicList,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserSummary {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicList {
    #[serde(default)]
    pub topics: Vec<TopicSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicSummary {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub posts_count: u32,
    pub created_at: String,
    pub bumped_at: String,
    pub last_posted_at: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub posters: Vec<Poster>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Poster {
    pub user_id: u64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicResponse {
    pub post_stream: PostStream,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostStream {
    #[serde(default)]
    pub posts: Vec<PostData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostData {
    pub id: u64,
    pub username: String,
    /// Rendered HTML body.
    #[serde(default)]
    pub cooked: String,
    pub created_at: String,
    pub post_number: u32,
}
