use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::api::{ErrorResponse, ListResponse};
use crate::clients::{CalendarClient, CalendarEvent};
use crate::forum::model::{generate_forum_id, Post, PostInput, Topic, TopicInput, TopicResponse};
use crate::store::traits::ForumStore;

pub struct ForumState<S> {
    pub store: Arc<S>,
    pub calendar: CalendarClient,
}

impl<S> Clone for ForumState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            calendar: self.calendar.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

fn calendar_event_for_topic(topic: &Topic) -> CalendarEvent {
    let now = Utc::now();
    CalendarEvent {
        title: format!("Forum Topic: {}", topic.title),
        start: topic.scheduled_date.unwrap_or(now).to_rfc3339(),
        end: topic
            .end_date
            .unwrap_or_else(|| now + Duration::days(1))
            .to_rfc3339(),
        desc: topic.description.clone(),
        all_day: false,
        created_by: "forum_service".to_string(),
        event_type: "forum_topic".to_string(),
        reference_id: topic.id.clone(),
        status: "active".to_string(),
    }
}

async fn topic_response<S: ForumStore>(
    store: &S,
    topic: Topic,
) -> Result<TopicResponse, (StatusCode, Json<ErrorResponse>)> {
    match store.list_posts_for_topic(&topic.id).await {
        Ok(posts) => Ok(TopicResponse { topic, posts }),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn create_topic<S: ForumStore>(
    State(state): State<ForumState<S>>,
    RequestJson(mut input): RequestJson<TopicInput>,
) -> Result<Json<TopicResponse>, (StatusCode, Json<ErrorResponse>)> {
    // A scheduled date implies the scheduled flag.
    if input.scheduled_date.is_some() && input.is_scheduled == 0 {
        input.is_scheduled = 1;
    }

    let mut topic = Topic::from_input(input);

    match state.store.insert_topic(topic.clone()).await {
        Ok(()) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&format!("Failed to create topic: {}", e))),
            ))
        }
    }

    // Every topic gets a calendar entry; the event id is stored on success.
    if let Some(event_id) = state
        .calendar
        .create_event("/api/events/forum-topic", &calendar_event_for_topic(&topic))
        .await
    {
        topic.calendar_event_id = Some(event_id);
        if let Err(e) = state.store.update_topic(topic.clone()).await {
            log::warn!(
                "calendar event id for topic '{}' was not persisted: {}",
                topic.id,
                e
            );
        }
    }

    Ok(Json(TopicResponse {
        topic,
        posts: Vec::new(),
    }))
}

pub async fn get_all_topics<S: ForumStore>(
    State(state): State<ForumState<S>>,
) -> Result<Json<ListResponse<TopicResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let topics = match state.store.list_topics().await {
        Ok(topics) => topics,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    let mut responses = Vec::with_capacity(topics.len());
    for topic in topics {
        responses.push(topic_response(&*state.store, topic).await?);
    }

    Ok(Json(ListResponse::new(responses)))
}

pub async fn get_topic<S: ForumStore>(
    State(state): State<ForumState<S>>,
    Path(topic_id): Path<String>,
) -> Result<Json<TopicResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_topic(&topic_id).await {
        Ok(Some(topic)) => Ok(Json(topic_response(&*state.store, topic).await?)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Topic not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn update_topic<S: ForumStore>(
    State(state): State<ForumState<S>>,
    Path(topic_id): Path<String>,
    RequestJson(input): RequestJson<TopicInput>,
) -> Result<Json<TopicResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut topic = match state.store.get_topic(&topic_id).await {
        Ok(Some(topic)) => topic,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Topic not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    };

    topic.title = input.title;
    topic.description = input.description;
    topic.scheduled_date = input.scheduled_date;
    topic.end_date = input.end_date;
    topic.is_scheduled = input.is_scheduled;

    match (topic.is_scheduled, topic.scheduled_date) {
        (1, Some(scheduled)) => {
            if topic.calendar_event_id.is_some() {
                state
                    .calendar
                    .update_event_by_reference(
                        &topic.id,
                        &serde_json::json!({
                            "title": format!("Forum Topic: {}", topic.title),
                            "start": scheduled.to_rfc3339(),
                            "end": topic
                                .end_date
                                .unwrap_or_else(|| scheduled + Duration::days(1))
                                .to_rfc3339(),
                            "desc": topic.description,
                        }),
                    )
                    .await;
            } else if let Some(event_id) = state
                .calendar
                .create_event("/api/events/forum-topic", &calendar_event_for_topic(&topic))
                .await
            {
                topic.calendar_event_id = Some(event_id);
            }
        }
        _ => {
            // No longer scheduled; drop the orphaned calendar entry.
            if let Some(event_id) = topic.calendar_event_id.clone() {
                if state.calendar.delete_event(&event_id).await {
                    topic.calendar_event_id = None;
                }
            }
        }
    }

    match state.store.update_topic(topic.clone()).await {
        Ok(true) => Ok(Json(topic_response(&*state.store, topic).await?)),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Topic not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Failed to update topic: {}", e))),
        )),
    }
}

pub async fn delete_topic<S: ForumStore>(
    State(state): State<ForumState<S>>,
    Path(topic_id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_topic(&topic_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Topic not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    state.calendar.delete_event_by_reference(&topic_id).await;

    match state.store.delete_topic(&topic_id).await {
        Ok(true) => Ok(Json(serde_json::json!({
            "status": "deleted",
            "id": topic_id
        }))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Topic not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Failed to delete topic: {}", e))),
        )),
    }
}

pub async fn create_post<S: ForumStore>(
    State(state): State<ForumState<S>>,
    Path(topic_id): Path<String>,
    RequestJson(input): RequestJson<PostInput>,
) -> Result<Json<Post>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_topic(&topic_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Topic not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    let post = Post {
        id: generate_forum_id(),
        topic_id,
        content: input.content,
        author: input.author,
        created_at: Utc::now(),
    };

    match state.store.insert_post(post.clone()).await {
        Ok(()) => Ok(Json(post)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Failed to create post: {}", e))),
        )),
    }
}

pub async fn get_topic_posts<S: ForumStore>(
    State(state): State<ForumState<S>>,
    Path(topic_id): Path<String>,
) -> Result<Json<ListResponse<Post>>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_topic(&topic_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Topic not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    match state.store.list_posts_for_topic(&topic_id).await {
        Ok(posts) => Ok(Json(ListResponse::new(posts))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}
