use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::{ErrorResponse, ListResponse, MessageResponse};
use crate::clients::{AuthClient, AuthUser, CalendarClient};
use crate::reviews::model::{CodeReview, ReviewStatus, User, ROLE_DEVELOPER, ROLE_REVIEWER};
use crate::store::traits::CodeReviewStore;

pub struct ReviewState<S> {
    pub store: Arc<S>,
    pub calendar: CalendarClient,
    pub auth: AuthClient,
}

impl<S> Clone for ReviewState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            calendar: self.calendar.clone(),
            auth: self.auth.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub status: Option<ReviewStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub role: Option<String>,
}

pub async fn create_review<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    user: AuthUser,
    RequestJson(mut review): RequestJson<CodeReview>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    if user.role != ROLE_DEVELOPER && user.role != ROLE_REVIEWER {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("Not authorized")),
        ));
    }

    // The verified identity wins over whatever the body claimed.
    review.author_id = user.id;

    match state.store.insert_review(review.clone()).await {
        Ok(()) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&format!("Failed to create review: {}", e))),
            ))
        }
    }

    let calendar_event = state
        .calendar
        .post_json(
            "/api/events/code-review",
            &serde_json::json!({
                "review_id": review.id,
                "title": review.title,
                "description": review.description,
                "status": review.status,
            }),
        )
        .await;

    let mut body = serde_json::to_value(&review).unwrap_or_default();
    if let Some(object) = body.as_object_mut() {
        object.insert(
            "calendar_event".to_string(),
            calendar_event.unwrap_or(serde_json::Value::Null),
        );
    }

    Ok(Json(body))
}

pub async fn get_reviews<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<ListResponse<CodeReview>>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.list_reviews(query.status).await {
        Ok(reviews) => Ok(Json(ListResponse::new(reviews))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn get_review<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    Path(review_id): Path<String>,
) -> Result<Json<CodeReview>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_review(&review_id).await {
        Ok(Some(review)) => Ok(Json(review)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Review not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn update_review<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    Path(review_id): Path<String>,
    user: AuthUser,
    RequestJson(mut review): RequestJson<CodeReview>,
) -> Result<Json<CodeReview>, (StatusCode, Json<ErrorResponse>)> {
    if user.role != ROLE_REVIEWER {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::new("Reviewer access required")),
        ));
    }

    if review.id != review_id {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Review ID mismatch")),
        ));
    }

    match state.store.get_review(&review_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Review not found")),
            ))
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    review.updated_at = Utc::now();

    match state.store.update_review(review.clone()).await {
        Ok(true) => Ok(Json(review)),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Review not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Failed to update review: {}", e))),
        )),
    }
}

pub async fn delete_review<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    Path(review_id): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.delete_review(&review_id).await {
        Ok(true) => Ok(Json(MessageResponse::new("Review deleted successfully"))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Review not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn create_user<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    RequestJson(user): RequestJson<User>,
) -> Result<Json<User>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_user(&user.id).await {
        Ok(Some(_)) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("User with this ID already exists")),
            ))
        }
        Ok(None) => {}
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(&e.to_string())),
            ))
        }
    }

    match state.store.insert_user(user.clone()).await {
        Ok(()) => Ok(Json(user)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&format!("Failed to create user: {}", e))),
        )),
    }
}

pub async fn get_users<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ListResponse<User>>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.list_users(query.role.as_deref()).await {
        Ok(users) => Ok(Json(ListResponse::new(users))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn get_user<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    Path(user_id): Path<String>,
) -> Result<Json<User>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.get_user(&user_id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("User not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn update_user<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    Path(user_id): Path<String>,
    RequestJson(user): RequestJson<User>,
) -> Result<Json<User>, (StatusCode, Json<ErrorResponse>)> {
    if user.id != user_id {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("User ID mismatch")),
        ));
    }

    match state.store.update_user(user.clone()).await {
        Ok(true) => Ok(Json(user)),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("User not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}

pub async fn delete_user<S: CodeReviewStore>(
    State(state): State<ReviewState<S>>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.delete_user(&user_id).await {
        Ok(true) => Ok(Json(MessageResponse::new("User deleted successfully"))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("User not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}
