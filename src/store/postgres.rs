use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::bugs::model::{Bug, ClientRecord, Employee};
use crate::forum::model::{Post, Topic};
use crate::reviews::model::{CodeReview, ReviewStatus, User};
use crate::store::traits::{
    BugStore, ClientStore, EmployeeStore, PostStore, ReviewStore, TopicStore, UserStore,
};

/// Shared PostgreSQL store for all three persistent services.
///
/// Document-shaped records (bugs, reviews and their users) live in JSONB
/// `doc` columns keyed by their domain id; the forum is fully relational.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_max_connections(database_url, 20).await
    }

    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the tables every service expects. Safe to run repeatedly.
    pub async fn migrate(&self) -> Result<()> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS bugs (
                bug_id TEXT PRIMARY KEY,
                doc JSONB NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS employees (
                employee_id TEXT PRIMARY KEY,
                doc JSONB NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS clients (
                client_id TEXT PRIMARY KEY,
                doc JSONB NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS reviews (
                id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                doc JSONB NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS review_users (
                id TEXT PRIMARY KEY,
                role TEXT NOT NULL,
                doc JSONB NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS topics (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                scheduled_date TIMESTAMPTZ,
                end_date TIMESTAMPTZ,
                is_scheduled INT NOT NULL DEFAULT 0,
                calendar_event_id TEXT
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                topic_id TEXT NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
                content TEXT NOT NULL,
                author TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to run schema migration")?;
        }

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode_doc<T: serde::de::DeserializeOwned>(row: &sqlx::postgres::PgRow) -> Result<T> {
    let doc: serde_json::Value = row.get("doc");
    serde_json::from_value(doc).context("Failed to decode stored document")
}

#[async_trait::async_trait]
impl BugStore for PostgresStore {
    async fn insert_bug(&self, bug: Bug) -> Result<()> {
        sqlx::query("INSERT INTO bugs (bug_id, doc) VALUES ($1, $2)")
            .bind(&bug.bug_id)
            .bind(serde_json::to_value(&bug)?)
            .execute(&self.pool)
            .await
            .context("Failed to insert bug")?;
        Ok(())
    }

    async fn get_bug(&self, bug_id: &str) -> Result<Option<Bug>> {
        let row = sqlx::query("SELECT doc FROM bugs WHERE bug_id = $1")
            .bind(bug_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch bug")?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list_bugs(&self) -> Result<Vec<Bug>> {
        let rows = sqlx::query("SELECT doc FROM bugs ORDER BY bug_id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list bugs")?;

        rows.iter().map(decode_doc).collect()
    }

    async fn list_bugs_for_employee(
        &self,
        employee_id: &str,
        status: Option<&str>,
    ) -> Result<Vec<Bug>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT doc FROM bugs WHERE doc->>'employee_id' = $1 AND doc->>'status' = $2 ORDER BY bug_id",
                )
                .bind(employee_id)
                .bind(status)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT doc FROM bugs WHERE doc->>'employee_id' = $1 ORDER BY bug_id")
                    .bind(employee_id)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list employee bugs")?;

        rows.iter().map(decode_doc).collect()
    }

    async fn assign_bug(&self, bug_id: &str, employee_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE bugs SET doc = jsonb_set(doc, '{employee_id}', to_jsonb($2::text)) WHERE bug_id = $1",
        )
        .bind(bug_id)
        .bind(employee_id)
        .execute(&self.pool)
        .await
        .context("Failed to assign bug")?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_bug_status(&self, bug_id: &str, employee_id: &str, status: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bugs SET doc = jsonb_set(doc, '{status}', to_jsonb($3::text))
            WHERE bug_id = $1 AND doc->>'employee_id' = $2
            "#,
        )
        .bind(bug_id)
        .bind(employee_id)
        .bind(status)
        .execute(&self.pool)
        .await
        .context("Failed to update bug status")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl EmployeeStore for PostgresStore {
    async fn insert_employee(&self, employee: Employee) -> Result<()> {
        sqlx::query("INSERT INTO employees (employee_id, doc) VALUES ($1, $2)")
            .bind(&employee.employee_id)
            .bind(serde_json::to_value(&employee)?)
            .execute(&self.pool)
            .await
            .context("Failed to insert employee")?;
        Ok(())
    }

    async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>> {
        let row = sqlx::query("SELECT doc FROM employees WHERE employee_id = $1")
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch employee")?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list_employees(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query("SELECT doc FROM employees ORDER BY employee_id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list employees")?;

        rows.iter().map(decode_doc).collect()
    }

    async fn bump_employee_counters(
        &self,
        employee_id: &str,
        pending_delta: i64,
        completed_delta: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE employees SET doc = jsonb_set(
                jsonb_set(doc, '{bugs_pending}',
                    to_jsonb(COALESCE((doc->>'bugs_pending')::bigint, 0) + $2)),
                '{bugs_completed}',
                to_jsonb(COALESCE((doc->>'bugs_completed')::bigint, 0) + $3))
            WHERE employee_id = $1
            "#,
        )
        .bind(employee_id)
        .bind(pending_delta)
        .bind(completed_delta)
        .execute(&self.pool)
        .await
        .context("Failed to update employee counters")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl ClientStore for PostgresStore {
    async fn insert_client(&self, client: ClientRecord) -> Result<()> {
        sqlx::query("INSERT INTO clients (client_id, doc) VALUES ($1, $2)")
            .bind(&client.client_id)
            .bind(serde_json::to_value(&client)?)
            .execute(&self.pool)
            .await
            .context("Failed to insert client")?;
        Ok(())
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<ClientRecord>> {
        let row = sqlx::query("SELECT doc FROM clients WHERE client_id = $1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch client")?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list_clients(&self) -> Result<Vec<ClientRecord>> {
        let rows = sqlx::query("SELECT doc FROM clients ORDER BY client_id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list clients")?;

        rows.iter().map(decode_doc).collect()
    }
}

#[async_trait::async_trait]
impl ReviewStore for PostgresStore {
    async fn insert_review(&self, review: CodeReview) -> Result<()> {
        sqlx::query("INSERT INTO reviews (id, status, doc) VALUES ($1, $2, $3)")
            .bind(&review.id)
            .bind(review.status.as_str())
            .bind(serde_json::to_value(&review)?)
            .execute(&self.pool)
            .await
            .context("Failed to insert review")?;
        Ok(())
    }

    async fn get_review(&self, id: &str) -> Result<Option<CodeReview>> {
        let row = sqlx::query("SELECT doc FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch review")?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list_reviews(&self, status: Option<ReviewStatus>) -> Result<Vec<CodeReview>> {
        let rows = match status {
            Some(status) => {
                sqlx::query("SELECT doc FROM reviews WHERE status = $1 ORDER BY id")
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT doc FROM reviews ORDER BY id")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list reviews")?;

        rows.iter().map(decode_doc).collect()
    }

    async fn update_review(&self, review: CodeReview) -> Result<bool> {
        let result = sqlx::query("UPDATE reviews SET status = $2, doc = $3 WHERE id = $1")
            .bind(&review.id)
            .bind(review.status.as_str())
            .bind(serde_json::to_value(&review)?)
            .execute(&self.pool)
            .await
            .context("Failed to update review")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_review(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete review")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: User) -> Result<()> {
        sqlx::query("INSERT INTO review_users (id, role, doc) VALUES ($1, $2, $3)")
            .bind(&user.id)
            .bind(&user.role)
            .bind(serde_json::to_value(&user)?)
            .execute(&self.pool)
            .await
            .context("Failed to insert user")?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT doc FROM review_users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        row.as_ref().map(decode_doc).transpose()
    }

    async fn list_users(&self, role: Option<&str>) -> Result<Vec<User>> {
        let rows = match role {
            Some(role) => {
                sqlx::query("SELECT doc FROM review_users WHERE role = $1 ORDER BY id")
                    .bind(role)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT doc FROM review_users ORDER BY id")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list users")?;

        rows.iter().map(decode_doc).collect()
    }

    async fn update_user(&self, user: User) -> Result<bool> {
        let result = sqlx::query("UPDATE review_users SET role = $2, doc = $3 WHERE id = $1")
            .bind(&user.id)
            .bind(&user.role)
            .bind(serde_json::to_value(&user)?)
            .execute(&self.pool)
            .await
            .context("Failed to update user")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM review_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete user")?;

        Ok(result.rows_affected() > 0)
    }
}

fn topic_from_row(row: &sqlx::postgres::PgRow) -> Topic {
    Topic {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        scheduled_date: row.get("scheduled_date"),
        end_date: row.get("end_date"),
        is_scheduled: row.get("is_scheduled"),
        calendar_event_id: row.get("calendar_event_id"),
    }
}

#[async_trait::async_trait]
impl TopicStore for PostgresStore {
    async fn insert_topic(&self, topic: Topic) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO topics (id, title, description, created_at, scheduled_date, end_date, is_scheduled, calendar_event_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&topic.id)
        .bind(&topic.title)
        .bind(&topic.description)
        .bind(topic.created_at)
        .bind(topic.scheduled_date)
        .bind(topic.end_date)
        .bind(topic.is_scheduled)
        .bind(&topic.calendar_event_id)
        .execute(&self.pool)
        .await
        .context("Failed to insert topic")?;
        Ok(())
    }

    async fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        let row = sqlx::query(
            "SELECT id, title, description, created_at, scheduled_date, end_date, is_scheduled, calendar_event_id FROM topics WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch topic")?;

        Ok(row.as_ref().map(topic_from_row))
    }

    async fn list_topics(&self) -> Result<Vec<Topic>> {
        let rows = sqlx::query(
            "SELECT id, title, description, created_at, scheduled_date, end_date, is_scheduled, calendar_event_id FROM topics ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list topics")?;

        Ok(rows.iter().map(topic_from_row).collect())
    }

    async fn update_topic(&self, topic: Topic) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE topics SET title = $2, description = $3, scheduled_date = $4,
                end_date = $5, is_scheduled = $6, calendar_event_id = $7
            WHERE id = $1
            "#,
        )
        .bind(&topic.id)
        .bind(&topic.title)
        .bind(&topic.description)
        .bind(topic.scheduled_date)
        .bind(topic.end_date)
        .bind(topic.is_scheduled)
        .bind(&topic.calendar_event_id)
        .execute(&self.pool)
        .await
        .context("Failed to update topic")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_topic(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM topics WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete topic")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl PostStore for PostgresStore {
    async fn insert_post(&self, post: Post) -> Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, topic_id, content, author, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&post.id)
        .bind(&post.topic_id)
        .bind(&post.content)
        .bind(&post.author)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert post")?;
        Ok(())
    }

    async fn list_posts_for_topic(&self, topic_id: &str) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, topic_id, content, author, created_at FROM posts WHERE topic_id = $1 ORDER BY created_at",
        )
        .bind(topic_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        let posts = rows
            .into_iter()
            .map(|row| Post {
                id: row.get("id"),
                topic_id: row.get("topic_id"),
                content: row.get("content"),
                author: row.get("author"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(posts)
    }
}
