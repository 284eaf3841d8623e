use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::vcs::handlers::{self, VcsState};

pub fn create_router() -> Router<VcsState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/repos", get(handlers::list_repositories))
        .route("/repos/:repo_name", post(handlers::create_repository))
        .route("/repos/:repo_name", delete(handlers::delete_repository))
        .route("/repos/:repo_name/branches", get(handlers::list_branches))
        .route("/repos/:repo_name/branches", post(handlers::create_branch))
        .route("/repos/:repo_name/commits", get(handlers::list_commits))
        .route("/repos/:repo_name/files", get(handlers::list_files))
        .route(
            "/repos/:repo_name/files/*file_path",
            get(handlers::get_file_content),
        )
        .route(
            "/repos/:repo_name/files/*file_path",
            put(handlers::update_file),
        )
        .route(
            "/repos/:repo_name/files/*file_path",
            delete(handlers::delete_file),
        )
        .route("/repos/:repo_name/checkout", post(handlers::checkout_branch))
        .route("/repos/:repo_name/diff", get(handlers::get_diff))
        .route("/repos/:repo_name/merge", post(handlers::merge_branches))
}
