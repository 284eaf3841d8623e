use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use devhub_rust::vcs::{self, GitBackend, VcsState};

fn test_app(repos_dir: &std::path::Path) -> axum::Router {
    vcs::create_router().with_state(VcsState {
        backend: GitBackend::new(repos_dir.to_path_buf()),
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn request(method: &str, path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(path: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn repository_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());

    // Nothing yet.
    let response = app.clone().oneshot(get("/repos")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["repositories"], json!([]));

    // Create, then reject the duplicate.
    let response = app.clone().oneshot(post_empty("/repos/widget")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(post_empty("/repos/widget")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.clone().oneshot(get("/repos")).await.unwrap();
    assert_eq!(body_json(response).await["repositories"], json!(["widget"]));

    // The seeded README is readable through the API.
    let response = app
        .clone()
        .oneshot(get("/repos/widget/files/README.md?branch=main"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content = body_json(response).await["content"].as_str().unwrap().to_string();
    assert!(content.starts_with("# widget"));

    // Delete and confirm it is gone.
    let response = app
        .clone()
        .oneshot(request("DELETE", "/repos/widget", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/repos/widget/branches")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn branch_file_and_commit_flow() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());

    app.clone().oneshot(post_empty("/repos/widget")).await.unwrap();

    // Branch off main.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/repos/widget/branches",
            json!({"name": "feature"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Unknown source branch is a 404, duplicate branch a 400.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/repos/widget/branches",
            json!({"name": "other", "source_branch": "ghost"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/repos/widget/branches",
            json!({"name": "feature"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.clone().oneshot(get("/repos/widget/branches")).await.unwrap();
    assert_eq!(
        body_json(response).await["branches"],
        json!(["feature", "main"])
    );

    // Commit a file to the feature branch.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            "/repos/widget/files/src/lib.rs?branch=feature",
            json!({
                "content": "pub fn hello() {}\n",
                "commit_message": "Add hello",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/repos/widget/files?branch=feature"))
        .await
        .unwrap();
    let files = body_json(response).await["files"].clone();
    assert!(files.as_array().unwrap().contains(&json!("src/lib.rs")));

    // Commit listing carries author and stats.
    let response = app
        .clone()
        .oneshot(get("/repos/widget/commits?branch=feature"))
        .await
        .unwrap();
    let commits = body_json(response).await["commits"].clone();
    let commits = commits.as_array().unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0]["message"], "Add hello");
    assert_eq!(commits[0]["author"]["name"], "Dev");
    assert_eq!(commits[0]["stats"]["insertions"], 1);

    // Diff of the tip against its parent.
    let tip = commits[0]["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(get(&format!("/repos/widget/diff?commit1={}", tip)))
        .await
        .unwrap();
    let diff = body_json(response).await["diff"].as_str().unwrap().to_string();
    assert!(diff.contains("+pub fn hello() {}"));

    // The root commit has no parent.
    let root = commits[1]["id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(get(&format!("/repos/widget/diff?commit1={}", root)))
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await["diff"],
        "This is the first commit, no diff available"
    );

    // Deleting the file records another commit.
    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            "/repos/widget/files/src/lib.rs?branch=feature",
            json!({
                "commit_message": "Drop hello",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/repos/widget/files/src/lib.rs?branch=feature"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn merge_paths() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());

    app.clone().oneshot(post_empty("/repos/widget")).await.unwrap();
    app.clone()
        .oneshot(request(
            "POST",
            "/repos/widget/branches",
            json!({"name": "feature"}),
        ))
        .await
        .unwrap();

    // Fast-forward: only the feature branch moved.
    app.clone()
        .oneshot(request(
            "PUT",
            "/repos/widget/files/feature.txt?branch=feature",
            json!({
                "content": "work\n",
                "commit_message": "Feature work",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/repos/widget/merge",
            json!({
                "source_branch": "feature",
                "target_branch": "main",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["message"],
        "Merged 'feature' into 'main' successfully"
    );
    assert!(body.get("status").is_none());

    // Conflict: both branches rewrite the same file.
    app.clone()
        .oneshot(request(
            "PUT",
            "/repos/widget/files/feature.txt?branch=feature",
            json!({
                "content": "feature side\n",
                "commit_message": "Feature edit",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }),
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(request(
            "PUT",
            "/repos/widget/files/feature.txt?branch=main",
            json!({
                "content": "main side\n",
                "commit_message": "Main edit",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/repos/widget/merge",
            json!({
                "source_branch": "feature",
                "target_branch": "main",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "conflict");

    // Missing branches answer 404.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/repos/widget/merge",
            json!({
                "source_branch": "ghost",
                "target_branch": "main",
                "author_name": "Dev",
                "author_email": "dev@example.com"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_and_missing_repo_errors() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());

    app.clone().oneshot(post_empty("/repos/widget")).await.unwrap();

    let response = app
        .clone()
        .oneshot(post_empty("/repos/widget/checkout?branch=main"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_empty("/repos/widget/checkout?branch=ghost"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(get("/repos/ghost/commits")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
