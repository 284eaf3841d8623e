use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use devhub_rust::archmodel::{self, ModelState};

fn test_app() -> axum::Router {
    archmodel::create_router().with_state(ModelState::new())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_text(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap()
}

const SAMPLE: &str = r#"
pub trait Store {
    fn load(&self) -> String;
}

pub struct FileStore;

impl Store for FileStore {
    fn load(&self) -> String {
        String::new()
    }
}

pub fn open_store(path: &str) -> FileStore {
    FileStore
}
"#;

#[tokio::test]
async fn analyze_generates_uml() {
    let app = test_app();

    let response = app
        .oneshot(post_json(
            "/analyze",
            json!({"code": SAMPLE, "target_architecture": "uml"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["model"], "uml");
    assert_eq!(body["metadata"]["language"], "rust");
    assert_eq!(body["metadata"]["total_components"], 3);

    let representation = body["representation"].as_str().unwrap();
    assert!(representation.starts_with("digraph"));
    assert!(representation.contains("\"Store\" -> \"FileStore\""));

    let names: Vec<_> = body["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"FileStore".to_string()));
    assert!(names.contains(&"open_store".to_string()));
}

#[tokio::test]
async fn analyze_generates_four_plus_one_and_adl() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/analyze",
            json!({"code": SAMPLE, "target_architecture": "4+1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["representation"]["logical_view"].is_object());
    assert!(body["representation"]["scenarios"].is_array());

    let response = app
        .clone()
        .oneshot(post_json(
            "/analyze",
            json!({"code": SAMPLE, "target_architecture": "adl"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let adl = body["representation"].as_str().unwrap();
    assert!(adl.contains("component FileStore {"));
}

#[tokio::test]
async fn analyze_rejects_bad_input() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/analyze",
            json!({"code": SAMPLE, "target_architecture": "c4"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("Unsupported architecture type"));

    let response = app
        .clone()
        .oneshot(post_json(
            "/analyze",
            json!({"code": "fn broken(", "target_architecture": "uml"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_reports_name_and_size() {
    let app = test_app();

    let response = app
        .oneshot(post_text("/upload?filename=store.rs", SAMPLE))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["filename"], "store.rs");
    assert_eq!(body["size"], SAMPLE.len());
}

#[tokio::test]
async fn visualize_upload_then_fetch() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_text("/visualize/upload?model_type=uml", SAMPLE))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;

    // Pull the link out of the confirmation page.
    let link_start = page.find("/visualize/uml?code_hash=").unwrap();
    let link = &page[link_start..link_start + "/visualize/uml?code_hash=".len() + 8];

    let response = app.clone().oneshot(get(link)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rendered = body_text(response).await;
    assert!(rendered.contains("UML Visualization"));
    assert!(rendered.contains("digraph"));
}

#[tokio::test]
async fn visualize_requires_a_known_hash() {
    let app = test_app();

    let response = app.clone().oneshot(get("/visualize/uml")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No code hash provided");

    let response = app
        .clone()
        .oneshot(get("/visualize/uml?code_hash=deadbeef"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
