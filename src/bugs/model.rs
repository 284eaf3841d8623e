use serde::{Deserialize, Serialize};

fn default_status() -> String {
    "Pending".to_string()
}

/// A tracked bug. `employee_id` is set once a manager assigns the bug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bug {
    pub bug_id: String,
    pub title: String,
    pub description: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    #[serde(default)]
    pub bugs_completed: i64,
    #[serde(default)]
    pub bugs_pending: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client_id: String,
    pub name: String,
}

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_COMPLETED: &str = "Completed";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bug_status_defaults_to_pending() {
        let bug: Bug = serde_json::from_str(
            r#"{"bug_id": "b-1", "title": "Crash", "description": "boom"}"#,
        )
        .unwrap();
        assert_eq!(bug.status, STATUS_PENDING);
        assert_eq!(bug.employee_id, None);
    }

    #[test]
    fn unassigned_bug_omits_employee_field() {
        let bug = Bug {
            bug_id: "b-2".to_string(),
            title: "Typo".to_string(),
            description: "docs".to_string(),
            status: default_status(),
            employee_id: None,
        };
        let json = serde_json::to_string(&bug).unwrap();
        assert!(!json.contains("employee_id"));
    }
}
