//! Report text assembly: topic listings, the summarization prompt, and the
//! final Nostr-ready message.

use forum_fetch::Activity;
use summarizer::Summarizer;
use tracing::warn;

/// Message published when the lookback window had no activity.
pub const NSTR_MESSAGE: &str = "NSTR - Nothing Significant to Report";

/// A formatted report, plus the summarizer failure when one occurred.
pub struct Report {
    pub message: String,
    pub summarizer_error: Option<String>,
}

/// Indented listing of active topics with tags, new-topic markers, post
/// counts, and links.
pub fn format_topic_list(activity: &Activity) -> String {
    let mut lines = Vec::new();
    for topic in &activity.topics {
        let tags = if topic.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", topic.tags.join(", "))
        };
        let new_marker = if topic.is_new() { " [NEW]" } else { "" };
        let count = topic.posts.len();
        let plural = if count == 1 { "" } else { "s" };
        lines.push(format!(
            "  {}{}{} ({} new post{})",
            topic.title, tags, new_marker, count, plural
        ));
        lines.push(format!("    {}", topic.url));
    }
    lines.join("\n")
}

/// Full post content arranged for the model, one section per topic.
pub fn format_posts_for_prompt(activity: &Activity) -> String {
    let mut sections = Vec::new();

    for topic in &activity.topics {
        let mut lines = vec![
            format!("## Topic: {}", topic.title),
            format!(
                "Tags: {}",
                if topic.tags.is_empty() {
                    "none".to_string()
                } else {
                    topic.tags.join(", ")
                }
            ),
            format!("URL: {}", topic.url),
            String::new(),
        ];

        for post in &topic.posts {
            let timestamp = post.created_at.format("%Y-%m-%d %H:%M UTC");
            lines.push(format!("### Post by {} ({timestamp}):", post.author));
            lines.push(post.content.clone());
            lines.push(String::new());
        }

        sections.push(lines.join("\n"));
    }

    sections.join("\n---\n\n")
}

/// The summarization prompt sent to the model.
pub fn summary_prompt(activity: &Activity) -> String {
    let posts_text = format_posts_for_prompt(activity);
    let topic_count = activity.topics.len();
    let post_count = activity.post_count();

    format!(
        "You are summarizing daily activity from the Bitcoin Network Operations \
Collective (BNOC) forum - a technical forum for Bitcoin network operators and developers.

In the past 24 hours, there were {post_count} new posts across {topic_count} topic(s).

Here is the full content of the discussions:

{posts_text}

Write a concise but informative summary for Bitcoin developers and network operators. Include:
1. Key observations or findings reported
2. Any security concerns or attacks discussed
3. Notable technical details or data shared
4. Action items or recommendations if any

Keep the summary under 280 characters if there's only 1-2 posts, otherwise keep it \
under 500 characters. Be direct and technical. Do not use emojis. Do not use markdown formatting."
    )
}

/// Assemble the final message, with or without a model summary.
pub fn assemble_report(activity: &Activity, summary: Option<&str>) -> String {
    let date = activity.fetched_at.format("%Y-%m-%d");

    match summary {
        Some(summary) => [
            format!("BNOC Daily Summary ({date})"),
            String::new(),
            summary.to_string(),
            String::new(),
            "Topics:".to_string(),
            format_topic_list(activity),
            String::new(),
            format!("Source: {}", activity.source_url),
        ]
        .join("\n"),
        None => {
            let topic_count = activity.topics.len();
            let topic_word = if topic_count == 1 { "topic" } else { "topics" };
            [
                format!("BNOC Daily Summary ({date})"),
                String::new(),
                format!("{topic_count} {topic_word} with activity:"),
                String::new(),
                format_topic_list(activity),
                String::new(),
                format!("Source: {}", activity.source_url),
            ]
            .join("\n")
        }
    }
}

/// Format the activity into a Nostr-ready message, summarizing when a
/// summarizer is available and falling back to the plain listing when it
/// fails. The failure is carried out so the caller can publish a notice.
pub async fn format_activity(activity: &Activity, summarizer: Option<&Summarizer>) -> Report {
    if activity.topics.is_empty() {
        return Report {
            message: NSTR_MESSAGE.to_string(),
            summarizer_error: None,
        };
    }

    if let Some(summarizer) = summarizer {
        if activity.post_count() > 0 {
            match summarizer.summarize(&summary_prompt(activity)).await {
                Ok(summary) => {
                    return Report {
                        message: assemble_report(activity, Some(&summary)),
                        summarizer_error: None,
                    };
                }
                Err(err) => {
                    warn!(error = %err, "Could not generate summary, using plain listing");
                    return Report {
                        message: assemble_report(activity, None),
                        summarizer_error: Some(err.to_string()),
                    };
                }
            }
        }
    }

    Report {
        message: assemble_report(activity, None),
        summarizer_error: None,
    }
}

/// Note published alongside the plain listing when summarization failed.
pub fn failure_notice(error: &str) -> String {
    format!(
        "The robot refused to summarize today's BNOC activity ({error}). \
A plain listing was posted instead. Complaints to the nearest AI lab."
    )
}
