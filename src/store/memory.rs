use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;

use crate::bugs::model::{Bug, ClientRecord, Employee};
use crate::forum::model::{Post, Topic};
use crate::reviews::model::{CodeReview, ReviewStatus, User};
use crate::store::traits::{
    BugStore, ClientStore, EmployeeStore, PostStore, ReviewStore, TopicStore, UserStore,
};

/// In-memory store backend. Used by the test suites and handy for running a
/// service without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    bugs: RwLock<HashMap<String, Bug>>,
    employees: RwLock<HashMap<String, Employee>>,
    clients: RwLock<HashMap<String, ClientRecord>>,
    reviews: RwLock<HashMap<String, CodeReview>>,
    users: RwLock<HashMap<String, User>>,
    topics: RwLock<HashMap<String, Topic>>,
    posts: RwLock<HashMap<String, Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl BugStore for MemoryStore {
    async fn insert_bug(&self, bug: Bug) -> Result<()> {
        self.bugs.write().insert(bug.bug_id.clone(), bug);
        Ok(())
    }

    async fn get_bug(&self, bug_id: &str) -> Result<Option<Bug>> {
        Ok(self.bugs.read().get(bug_id).cloned())
    }

    async fn list_bugs(&self) -> Result<Vec<Bug>> {
        let mut bugs: Vec<_> = self.bugs.read().values().cloned().collect();
        bugs.sort_by(|a, b| a.bug_id.cmp(&b.bug_id));
        Ok(bugs)
    }

    async fn list_bugs_for_employee(
        &self,
        employee_id: &str,
        status: Option<&str>,
    ) -> Result<Vec<Bug>> {
        let mut bugs: Vec<_> = self
            .bugs
            .read()
            .values()
            .filter(|bug| bug.employee_id.as_deref() == Some(employee_id))
            .filter(|bug| status.map_or(true, |s| bug.status == s))
            .cloned()
            .collect();
        bugs.sort_by(|a, b| a.bug_id.cmp(&b.bug_id));
        Ok(bugs)
    }

    async fn assign_bug(&self, bug_id: &str, employee_id: &str) -> Result<bool> {
        let mut bugs = self.bugs.write();
        match bugs.get_mut(bug_id) {
            Some(bug) => {
                bug.employee_id = Some(employee_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_bug_status(&self, bug_id: &str, employee_id: &str, status: &str) -> Result<bool> {
        let mut bugs = self.bugs.write();
        match bugs.get_mut(bug_id) {
            Some(bug) if bug.employee_id.as_deref() == Some(employee_id) => {
                bug.status = status.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl EmployeeStore for MemoryStore {
    async fn insert_employee(&self, employee: Employee) -> Result<()> {
        self.employees
            .write()
            .insert(employee.employee_id.clone(), employee);
        Ok(())
    }

    async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>> {
        Ok(self.employees.read().get(employee_id).cloned())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let mut employees: Vec<_> = self.employees.read().values().cloned().collect();
        employees.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(employees)
    }

    async fn bump_employee_counters(
        &self,
        employee_id: &str,
        pending_delta: i64,
        completed_delta: i64,
    ) -> Result<bool> {
        let mut employees = self.employees.write();
        match employees.get_mut(employee_id) {
            Some(employee) => {
                employee.bugs_pending += pending_delta;
                employee.bugs_completed += completed_delta;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl ClientStore for MemoryStore {
    async fn insert_client(&self, client: ClientRecord) -> Result<()> {
        self.clients.write().insert(client.client_id.clone(), client);
        Ok(())
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<ClientRecord>> {
        Ok(self.clients.read().get(client_id).cloned())
    }

    async fn list_clients(&self) -> Result<Vec<ClientRecord>> {
        let mut clients: Vec<_> = self.clients.read().values().cloned().collect();
        clients.sort_by(|a, b| a.client_id.cmp(&b.client_id));
        Ok(clients)
    }
}

#[async_trait::async_trait]
impl ReviewStore for MemoryStore {
    async fn insert_review(&self, review: CodeReview) -> Result<()> {
        self.reviews.write().insert(review.id.clone(), review);
        Ok(())
    }

    async fn get_review(&self, id: &str) -> Result<Option<CodeReview>> {
        Ok(self.reviews.read().get(id).cloned())
    }

    async fn list_reviews(&self, status: Option<ReviewStatus>) -> Result<Vec<CodeReview>> {
        let mut reviews: Vec<_> = self
            .reviews
            .read()
            .values()
            .filter(|review| status.map_or(true, |s| review.status == s))
            .cloned()
            .collect();
        reviews.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(reviews)
    }

    async fn update_review(&self, review: CodeReview) -> Result<bool> {
        let mut reviews = self.reviews.write();
        if !reviews.contains_key(&review.id) {
            return Ok(false);
        }
        reviews.insert(review.id.clone(), review);
        Ok(true)
    }

    async fn delete_review(&self, id: &str) -> Result<bool> {
        Ok(self.reviews.write().remove(id).is_some())
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<()> {
        self.users.write().insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn list_users(&self, role: Option<&str>) -> Result<Vec<User>> {
        let mut users: Vec<_> = self
            .users
            .read()
            .values()
            .filter(|user| role.map_or(true, |r| user.role == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }

    async fn update_user(&self, user: User) -> Result<bool> {
        let mut users = self.users.write();
        if !users.contains_key(&user.id) {
            return Ok(false);
        }
        users.insert(user.id.clone(), user);
        Ok(true)
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        Ok(self.users.write().remove(id).is_some())
    }
}

#[async_trait::async_trait]
impl TopicStore for MemoryStore {
    async fn insert_topic(&self, topic: Topic) -> Result<()> {
        self.topics.write().insert(topic.id.clone(), topic);
        Ok(())
    }

    async fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        Ok(self.topics.read().get(id).cloned())
    }

    async fn list_topics(&self) -> Result<Vec<Topic>> {
        let mut topics: Vec<_> = self.topics.read().values().cloned().collect();
        topics.sort_by_key(|topic| topic.created_at);
        Ok(topics)
    }

    async fn update_topic(&self, topic: Topic) -> Result<bool> {
        let mut topics = self.topics.write();
        if !topics.contains_key(&topic.id) {
            return Ok(false);
        }
        topics.insert(topic.id.clone(), topic);
        Ok(true)
    }

    async fn delete_topic(&self, id: &str) -> Result<bool> {
        if self.topics.write().remove(id).is_none() {
            return Ok(false);
        }
        // Mirror the relational cascade.
        self.posts.write().retain(|_, post| post.topic_id != id);
        Ok(true)
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: Post) -> Result<()> {
        self.posts.write().insert(post.id.clone(), post);
        Ok(())
    }

    async fn list_posts_for_topic(&self, topic_id: &str) -> Result<Vec<Post>> {
        let mut posts: Vec<_> = self
            .posts
            .read()
            .values()
            .filter(|post| post.topic_id == topic_id)
            .cloned()
            .collect();
        posts.sort_by_key(|post| post.created_at);
        Ok(posts)
    }
}
