use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::forum::handlers::{self, ForumState};
use crate::store::traits::ForumStore;

pub fn create_router<S: ForumStore + 'static>() -> Router<ForumState<S>> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/topics/", post(handlers::create_topic::<S>))
        .route("/topics/", get(handlers::get_all_topics::<S>))
        .route("/topics/:topic_id", get(handlers::get_topic::<S>))
        .route("/topics/:topic_id", put(handlers::update_topic::<S>))
        .route("/topics/:topic_id", delete(handlers::delete_topic::<S>))
        .route("/topics/:topic_id/posts/", post(handlers::create_post::<S>))
        .route(
            "/topics/:topic_id/posts/",
            get(handlers::get_topic_posts::<S>),
        )
}
