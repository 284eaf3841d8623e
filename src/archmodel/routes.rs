use axum::{
    routing::{get, post},
    Router,
};

use crate::archmodel::handlers::{self, ModelState};

pub fn create_router() -> Router<ModelState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/analyze", post(handlers::analyze_code))
        .route("/upload", post(handlers::upload_file))
        .route(
            "/visualize/upload",
            post(handlers::visualize_uploaded_file),
        )
        .route("/visualize/:model_type", get(handlers::visualize_model))
}
