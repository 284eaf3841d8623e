use serde::{Deserialize, Serialize};

/// Event payload understood by the calendar service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: String,
    pub end: String,
    pub desc: String,
    #[serde(rename = "allDay")]
    pub all_day: bool,
    #[serde(rename = "createdBy")]
    pub created_by: String,
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(rename = "referenceId")]
    pub reference_id: String,
    pub status: String,
}

/// HTTP client for the calendar service.
///
/// Calendar updates are side effects of bug and forum operations; a failure
/// here is logged and never propagated to the caller.
#[derive(Debug, Clone)]
pub struct CalendarClient {
    http: reqwest::Client,
    base_url: String,
}

impl CalendarClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create an event, returning the id the calendar service assigned (if any).
    pub async fn create_event(&self, path: &str, event: &CalendarEvent) -> Option<String> {
        let url = format!("{}{}", self.base_url, path);
        match self.http.post(&url).json(event).send().await {
            Ok(response) if response.status().is_success() => {
                let body: serde_json::Value = response.json().await.unwrap_or_default();
                body.get("_id")
                    .and_then(|id| id.as_str())
                    .map(|id| id.to_string())
            }
            Ok(response) => {
                log::warn!(
                    "calendar service rejected event for '{}': {}",
                    event.reference_id,
                    response.status()
                );
                None
            }
            Err(e) => {
                log::warn!("failed to reach calendar service at {}: {}", url, e);
                None
            }
        }
    }

    /// Post an arbitrary payload to a calendar endpoint, answering the
    /// service's JSON body when it accepts. The review service uses this for
    /// its bespoke `/api/events/code-review` endpoint.
    pub async fn post_json(
        &self,
        path: &str,
        payload: &serde_json::Value,
    ) -> Option<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        match self.http.post(&url).json(payload).send().await {
            Ok(response) if response.status().is_success() => response.json().await.ok(),
            Ok(response) => {
                log::warn!("calendar service answered {} for {}", response.status(), url);
                None
            }
            Err(e) => {
                log::warn!("failed to reach calendar service at {}: {}", url, e);
                None
            }
        }
    }

    /// Update the event attached to a reference id (bug id, topic id).
    pub async fn update_event_by_reference(&self, reference_id: &str, patch: &serde_json::Value) {
        let url = format!("{}/api/events/by-reference/{}", self.base_url, reference_id);
        match self.http.put(&url).json(patch).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => log::warn!(
                "failed to update calendar event for '{}': {}",
                reference_id,
                response.status()
            ),
            Err(e) => log::warn!("failed to reach calendar service at {}: {}", url, e),
        }
    }

    /// Delete the event attached to a reference id.
    pub async fn delete_event_by_reference(&self, reference_id: &str) {
        let url = format!("{}/api/events/by-reference/{}", self.base_url, reference_id);
        match self.http.delete(&url).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => log::warn!(
                "failed to delete calendar event for '{}': {}",
                reference_id,
                response.status()
            ),
            Err(e) => log::warn!("failed to reach calendar service at {}: {}", url, e),
        }
    }

    /// Delete an event by its own id. Returns whether the calendar confirmed it.
    pub async fn delete_event(&self, event_id: &str) -> bool {
        let url = format!("{}/api/events/{}", self.base_url, event_id);
        match self.http.delete(&url).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::warn!(
                    "failed to delete calendar event '{}': {}",
                    event_id,
                    response.status()
                );
                false
            }
            Err(e) => {
                log::warn!("failed to reach calendar service at {}: {}", url, e);
                false
            }
        }
    }
}
