use anyhow::{anyhow, Result};
use serde_json::json;

/// HTTP client for the forum service, used by the bug tracker to open
/// discussion topics for bugs.
#[derive(Debug, Clone)]
pub struct ForumClient {
    http: reqwest::Client,
    base_url: String,
}

impl ForumClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn create_topic(&self, title: &str, description: &str) -> Result<serde_json::Value> {
        let url = format!("{}/topics/", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&json!({
                "title": title,
                "description": description,
                "is_scheduled": 0
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("forum service answered {}: {}", status, body));
        }

        Ok(response.json().await?)
    }
}
