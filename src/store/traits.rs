use anyhow::Result;

use crate::bugs::model::{Bug, ClientRecord, Employee};
use crate::forum::model::{Post, Topic};
use crate::reviews::model::{CodeReview, ReviewStatus, User};

#[async_trait::async_trait]
pub trait BugStore: Send + Sync {
    async fn insert_bug(&self, bug: Bug) -> Result<()>;
    async fn get_bug(&self, bug_id: &str) -> Result<Option<Bug>>;
    async fn list_bugs(&self) -> Result<Vec<Bug>>;
    /// List an employee's bugs, optionally narrowed to one status.
    async fn list_bugs_for_employee(
        &self,
        employee_id: &str,
        status: Option<&str>,
    ) -> Result<Vec<Bug>>;
    /// Attach a bug to an employee. Returns false when the bug is unknown.
    async fn assign_bug(&self, bug_id: &str, employee_id: &str) -> Result<bool>;
    /// Set the status of a bug assigned to the given employee. Returns false
    /// when no such assignment exists.
    async fn set_bug_status(&self, bug_id: &str, employee_id: &str, status: &str) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn insert_employee(&self, employee: Employee) -> Result<()>;
    async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>>;
    async fn list_employees(&self) -> Result<Vec<Employee>>;
    /// Adjust the pending/completed counters kept on the employee record.
    async fn bump_employee_counters(
        &self,
        employee_id: &str,
        pending_delta: i64,
        completed_delta: i64,
    ) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert_client(&self, client: ClientRecord) -> Result<()>;
    async fn get_client(&self, client_id: &str) -> Result<Option<ClientRecord>>;
    async fn list_clients(&self) -> Result<Vec<ClientRecord>>;
}

#[async_trait::async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert_review(&self, review: CodeReview) -> Result<()>;
    async fn get_review(&self, id: &str) -> Result<Option<CodeReview>>;
    async fn list_reviews(&self, status: Option<ReviewStatus>) -> Result<Vec<CodeReview>>;
    /// Replace an existing review. Returns false when the id is unknown.
    async fn update_review(&self, review: CodeReview) -> Result<bool>;
    async fn delete_review(&self, id: &str) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: User) -> Result<()>;
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
    async fn list_users(&self, role: Option<&str>) -> Result<Vec<User>>;
    async fn update_user(&self, user: User) -> Result<bool>;
    async fn delete_user(&self, id: &str) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait TopicStore: Send + Sync {
    async fn insert_topic(&self, topic: Topic) -> Result<()>;
    async fn get_topic(&self, id: &str) -> Result<Option<Topic>>;
    async fn list_topics(&self) -> Result<Vec<Topic>>;
    async fn update_topic(&self, topic: Topic) -> Result<bool>;
    /// Delete a topic and, through the schema, its posts.
    async fn delete_topic(&self, id: &str) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: Post) -> Result<()>;
    async fn list_posts_for_topic(&self, topic_id: &str) -> Result<Vec<Post>>;
}

/// Everything the bug tracker needs from storage.
pub trait TrackerStore: BugStore + EmployeeStore + ClientStore {}
impl<T: BugStore + EmployeeStore + ClientStore> TrackerStore for T {}

/// Everything the code review service needs from storage.
pub trait CodeReviewStore: ReviewStore + UserStore {}
impl<T: ReviewStore + UserStore> CodeReviewStore for T {}

/// Everything the forum service needs from storage.
pub trait ForumStore: TopicStore + PostStore {}
impl<T: TopicStore + PostStore> ForumStore for T {}

pub trait Store: TrackerStore + CodeReviewStore + ForumStore + Send + Sync {}
impl<T: TrackerStore + CodeReviewStore + ForumStore + Send + Sync> Store for T {}
