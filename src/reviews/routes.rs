use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::reviews::handlers::{self, ReviewState};
use crate::store::traits::CodeReviewStore;

pub fn create_router<S: CodeReviewStore + 'static>() -> Router<ReviewState<S>> {
    Router::new()
        .route("/reviews/", post(handlers::create_review::<S>))
        .route("/reviews/", get(handlers::get_reviews::<S>))
        .route("/reviews/:review_id", get(handlers::get_review::<S>))
        .route("/reviews/:review_id", put(handlers::update_review::<S>))
        .route("/reviews/:review_id", delete(handlers::delete_review::<S>))
        .route("/users/", post(handlers::create_user::<S>))
        .route("/users/", get(handlers::get_users::<S>))
        .route("/users/:user_id", get(handlers::get_user::<S>))
        .route("/users/:user_id", put(handlers::update_user::<S>))
        .route("/users/:user_id", delete(handlers::delete_user::<S>))
}
