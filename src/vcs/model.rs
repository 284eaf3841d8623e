use serde::{Deserialize, Serialize};

fn default_source_branch() -> String {
    "main".to_string()
}

fn default_merge_message() -> String {
    "Merge branch".to_string()
}

/// Request body for creating a branch.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBranch {
    pub name: String,
    #[serde(default = "default_source_branch")]
    pub source_branch: String,
}

/// Request body for writing a file and committing it.
#[derive(Debug, Clone, Deserialize)]
pub struct FileWrite {
    pub content: String,
    pub commit_message: String,
    pub author_name: String,
    pub author_email: String,
}

/// Request body for deleting a file and committing the removal.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDelete {
    pub commit_message: String,
    pub author_name: String,
    pub author_email: String,
}

/// Request body for merging one branch into another.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub source_branch: String,
    pub target_branch: String,
    #[serde(default = "default_merge_message")]
    pub commit_message: String,
    pub author_name: String,
    pub author_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchQuery {
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultBranchQuery {
    #[serde(default = "default_source_branch")]
    pub branch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutQuery {
    pub branch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiffQuery {
    pub commit1: String,
    pub commit2: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitStats {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

/// One entry in a commit listing, stats computed against the first parent.
#[derive(Debug, Clone, Serialize)]
pub struct CommitEntry {
    pub id: String,
    pub message: String,
    pub author: CommitAuthor,
    pub date: String,
    pub stats: CommitStats,
}

#[derive(Debug, Serialize)]
pub struct RepoListResponse {
    pub repositories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BranchListResponse {
    pub branches: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CommitListResponse {
    pub commits: Vec<CommitEntry>,
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FileContentResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub diff: String,
}

/// Merge response. `status` is only present when the merge was aborted on
/// conflicts; a clean merge answers with the message alone.
#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_branch_defaults_to_main_source() {
        let branch: NewBranch = serde_json::from_str(r#"{"name": "feature"}"#).unwrap();
        assert_eq!(branch.source_branch, "main");
    }

    #[test]
    fn merge_request_defaults_its_commit_message() {
        let request: MergeRequest = serde_json::from_str(
            r#"{
                "source_branch": "feature",
                "target_branch": "main",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }"#,
        )
        .unwrap();
        assert_eq!(request.commit_message, "Merge branch");
    }

    #[test]
    fn conflict_status_is_omitted_on_success() {
        let clean = MergeResponse {
            message: "done".to_string(),
            status: None,
        };
        assert!(!serde_json::to_string(&clean).unwrap().contains("status"));

        let conflicted = MergeResponse {
            message: "aborted".to_string(),
            status: Some("conflict".to_string()),
        };
        assert!(serde_json::to_string(&conflicted)
            .unwrap()
            .contains(r#""status":"conflict""#));
    }
}
