use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{ErrorResponse, ListResponse, MessageResponse};
use crate::bugs::model::{Bug, ClientRecord, Employee, STATUS_COMPLETED, STATUS_PENDING};
use crate::clients::{CalendarClient, CalendarEvent, ForumClient};
use crate::store::traits::TrackerStore;

pub struct BugState<S> {
    pub store: Arc<S>,
    pub calendar: CalendarClient,
    pub forum: ForumClient,
}

impl<S> Clone for BugState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            calendar: self.calendar.clone(),
            forum: self.forum.clone(),
        }
    }
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to the Bug Tracker"))
}

/// Calendar event announcing a new bug, with a default 7-day deadline.
fn calendar_event_for_bug(bug: &Bug) -> CalendarEvent {
    let now = Utc::now();
    CalendarEvent {
        title: format!("Bug: {}", bug.title),
        start: now.to_rfc3339(),
        end: (now + Duration::days(7)).to_rfc3339(),
        desc: bug.description.clone(),
        all_day: false,
        created_by: "bug_tracker".to_string(),
        event_type: "bug".to_string(),
        reference_id: bug.bug_id.clone(),
        status: bug.status.clone(),
    }
}

pub async fn create_bug<S: TrackerStore>(
    State(state): State<BugState<S>>,
    RequestJson(bug): RequestJson<Bug>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.insert_bug(bug.clone()).await {
        Ok(()) => {
            if state
                .calendar
                .create_event("/api/events", &calendar_event_for_bug(&bug))
                .await
                .is_some()
            {
                log::info!("calendar event created for bug {}", bug.bug_id);
            }
            Ok(Json(MessageResponse::new("Bug created successfully")))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Failed to create bug: {}", e))),
        )),
    }
}

pub async fn create_client<S: TrackerStore>(
    State(state): State<BugState<S>>,
    RequestJson(client): RequestJson<ClientRecord>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_client(&client.client_id).await {
        Ok(Some(_)) => return Ok(Json(MessageResponse::new("Client already exists"))),
        Ok(None) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    match state.store.insert_client(client).await {
        Ok(()) => Ok(Json(MessageResponse::new("Client created successfully"))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Failed to create client: {}", e))),
        )),
    }
}

pub async fn create_employee<S: TrackerStore>(
    State(state): State<BugState<S>>,
    RequestJson(employee): RequestJson<Employee>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_employee(&employee.employee_id).await {
        Ok(Some(_)) => return Ok(Json(MessageResponse::new("Employee already exists"))),
        Ok(None) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    match state.store.insert_employee(employee).await {
        Ok(()) => Ok(Json(MessageResponse::new("Employee created successfully"))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!(
                "Failed to create employee: {}",
                e
            ))),
        )),
    }
}

pub async fn list_employees<S: TrackerStore>(
    State(state): State<BugState<S>>,
) -> Result<Json<ListResponse<Employee>>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.list_employees().await {
        Ok(employees) => Ok(Json(ListResponse::new(employees))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn list_clients<S: TrackerStore>(
    State(state): State<BugState<S>>,
) -> Result<Json<ListResponse<ClientRecord>>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.list_clients().await {
        Ok(clients) => Ok(Json(ListResponse::new(clients))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn list_bugs<S: TrackerStore>(
    State(state): State<BugState<S>>,
) -> Result<Json<ListResponse<Bug>>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.list_bugs().await {
        Ok(bugs) => Ok(Json(ListResponse::new(bugs))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignQuery {
    pub bug_id: String,
    pub employee_id: String,
}

pub async fn assign_bug<S: TrackerStore>(
    State(state): State<BugState<S>>,
    Query(query): Query<AssignQuery>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.assign_bug(&query.bug_id, &query.employee_id).await {
        Ok(true) => {
            if let Err(e) = state
                .store
                .bump_employee_counters(&query.employee_id, 1, 0)
                .await
            {
                log::warn!(
                    "bug '{}' assigned but counters for '{}' were not updated: {}",
                    query.bug_id,
                    query.employee_id,
                    e
                );
            }
            Ok(Json(MessageResponse::new("Bug assigned successfully")))
        }
        Ok(false) => Ok(Json(MessageResponse::new("Bug assignment failed"))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn list_employee_bugs<S: TrackerStore>(
    State(state): State<BugState<S>>,
    Path(employee_id): Path<String>,
) -> Result<Json<ListResponse<Bug>>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.list_bugs_for_employee(&employee_id, None).await {
        Ok(bugs) => Ok(Json(ListResponse::new(bugs))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn list_completed_bugs<S: TrackerStore>(
    State(state): State<BugState<S>>,
    Path(employee_id): Path<String>,
) -> Result<Json<ListResponse<Bug>>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .store
        .list_bugs_for_employee(&employee_id, Some(STATUS_COMPLETED))
        .await
    {
        Ok(bugs) => Ok(Json(ListResponse::new(bugs))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn list_pending_bugs<S: TrackerStore>(
    State(state): State<BugState<S>>,
    Path(employee_id): Path<String>,
) -> Result<Json<ListResponse<Bug>>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .store
        .list_bugs_for_employee(&employee_id, Some(STATUS_PENDING))
        .await
    {
        Ok(bugs) => Ok(Json(ListResponse::new(bugs))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub bug_id: String,
    pub status: String,
}

pub async fn update_bug_status<S: TrackerStore>(
    State(state): State<BugState<S>>,
    Path(employee_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_bug(&query.bug_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(Json(MessageResponse::new("Bug not found"))),
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    let updated = match state
        .store
        .set_bug_status(&query.bug_id, &employee_id, &query.status)
        .await
    {
        Ok(updated) => updated,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    if updated {
        if let Err(e) = state.store.bump_employee_counters(&employee_id, 0, 1).await {
            log::warn!("completed counter for '{}' was not updated: {}", employee_id, e);
        }

        // Keep the calendar entry in step with the bug.
        state
            .calendar
            .update_event_by_reference(
                &query.bug_id,
                &serde_json::json!({ "status": query.status }),
            )
            .await;
    }

    Ok(Json(MessageResponse::new(format!(
        "Bug {} updated to status {}",
        query.bug_id, query.status
    ))))
}

#[derive(Debug, Deserialize)]
pub struct ForumTopicQuery {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Open a forum discussion for a bug through the forum service.
pub async fn create_forum_topic<S: TrackerStore>(
    State(state): State<BugState<S>>,
    Path(bug_id): Path<String>,
    Query(query): Query<ForumTopicQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let bug = match state.store.get_bug(&bug_id).await {
        Ok(Some(bug)) => bug,
        Ok(None) => {
            return Ok(Json(serde_json::json!({ "message": "Bug not found" })));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    let title = query
        .title
        .unwrap_or_else(|| format!("Discussion: Bug #{} - {}", bug_id, bug.title));
    let description = query.description.unwrap_or_else(|| {
        format!(
            "This topic is for discussing bug #{}: {}",
            bug_id, bug.description
        )
    });

    match state.forum.create_topic(&title, &description).await {
        Ok(topic) => Ok(Json(serde_json::json!({
            "message": "Forum topic created successfully",
            "topic": topic
        }))),
        Err(e) => Ok(Json(serde_json::json!({
            "message": format!("Failed to create forum topic: {}", e)
        }))),
    }
}
