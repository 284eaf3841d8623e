use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::InProgress => "in_progress",
            ReviewStatus::Completed => "completed",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

impl Default for ReviewStatus {
    fn default() -> Self {
        ReviewStatus::Pending
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A code review request. `author_id` is always overwritten with the
/// verified caller identity on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeReview {
    pub id: String,
    pub title: String,
    pub description: String,
    pub code_snippet: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<String>,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default = "now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "now")]
    pub updated_at: DateTime<Utc>,
}

/// An account known to the review service. Role is either "developer" or
/// "reviewer"; the auth service is the source of truth for live identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default = "now")]
    pub created_at: DateTime<Utc>,
}

pub const ROLE_DEVELOPER: &str = "developer";
pub const ROLE_REVIEWER: &str = "reviewer";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_status_uses_snake_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&ReviewStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        let status: ReviewStatus = serde_json::from_str(r#""rejected""#).unwrap();
        assert_eq!(status, ReviewStatus::Rejected);
    }

    #[test]
    fn review_defaults_fill_status_comments_and_timestamps() {
        let review: CodeReview = serde_json::from_str(
            r#"{
                "id": "r-1",
                "title": "Add retries",
                "description": "network layer",
                "code_snippet": "fn retry() {}",
                "author_id": "u-1"
            }"#,
        )
        .unwrap();
        assert_eq!(review.status, ReviewStatus::Pending);
        assert!(review.comments.is_empty());
        assert_eq!(review.reviewer_id, None);
    }
}
