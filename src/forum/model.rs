use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generate the short hex ids the forum hands out for topics and posts.
pub fn generate_forum_id() -> String {
    hex::encode(rand::random::<[u8; 8]>())
}

/// Input payload for creating or updating a topic.
///
/// `is_scheduled` is an integer flag (0/1) on the wire; clients predate the
/// service and send it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_scheduled: i32,
    #[serde(default)]
    pub calendar_event_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_scheduled: i32,
    pub calendar_event_id: Option<String>,
}

impl Topic {
    pub fn from_input(input: TopicInput) -> Self {
        Self {
            id: generate_forum_id(),
            title: input.title,
            description: input.description,
            created_at: Utc::now(),
            scheduled_date: input.scheduled_date,
            end_date: input.end_date,
            is_scheduled: input.is_scheduled,
            calendar_event_id: input.calendar_event_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostInput {
    pub content: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub topic_id: String,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Topic as served to clients, posts embedded.
#[derive(Debug, Clone, Serialize)]
pub struct TopicResponse {
    #[serde(flatten)]
    pub topic: Topic,
    pub posts: Vec<Post>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forum_ids_are_sixteen_hex_chars() {
        let id = generate_forum_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn topic_input_defaults_to_unscheduled() {
        let input: TopicInput =
            serde_json::from_str(r#"{"title": "Standup", "description": "daily"}"#).unwrap();
        assert_eq!(input.is_scheduled, 0);
        assert!(input.scheduled_date.is_none());
    }
}
