use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use devhub_rust::clients::CalendarClient;
use devhub_rust::forum::{self, ForumState};
use devhub_rust::store::MemoryStore;

// Calendar side effects point at a closed port and are best-effort.
fn test_app() -> axum::Router {
    forum::create_router::<MemoryStore>().with_state(ForumState {
        store: Arc::new(MemoryStore::new()),
        calendar: CalendarClient::new("http://127.0.0.1:9".to_string()),
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

#[tokio::test]
async fn health_check() {
    let app = test_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn topic_crud_with_posts() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/topics/",
            json!({"title": "Release planning", "description": "Q3 scope"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let topic = body_json(response).await;
    let topic_id = topic["id"].as_str().unwrap().to_string();
    assert_eq!(topic["is_scheduled"], 0);
    assert_eq!(topic["calendar_event_id"], Value::Null);
    assert_eq!(topic["posts"], json!([]));

    // Post into the topic.
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            &format!("/topics/{}/posts/", topic_id),
            json!({"content": "I vote for option A", "author": "alice"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let post = body_json(response).await;
    assert_eq!(post["topic_id"], topic_id.as_str());

    let response = app
        .clone()
        .oneshot(get(&format!("/topics/{}", topic_id)))
        .await
        .unwrap();
    let fetched = body_json(response).await;
    assert_eq!(fetched["posts"].as_array().unwrap().len(), 1);

    // Update the topic body.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/topics/{}", topic_id),
            json!({"title": "Release planning", "description": "Q3 and Q4 scope"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["description"], "Q3 and Q4 scope");

    // Delete it, posts included.
    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/topics/{}", topic_id),
            json!({}),
        ))
        .await
        .unwrap();
    let deleted = body_json(response).await;
    assert_eq!(deleted["status"], "deleted");
    assert_eq!(deleted["id"], topic_id.as_str());

    let response = app
        .clone()
        .oneshot(get(&format!("/topics/{}", topic_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scheduled_date_implies_the_flag() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/topics/",
            json!({
                "title": "Maintenance window",
                "description": "downtime",
                "scheduled_date": "2026-09-01T10:00:00Z"
            }),
        ))
        .await
        .unwrap();
    let topic = body_json(response).await;
    assert_eq!(topic["is_scheduled"], 1);
}

#[tokio::test]
async fn missing_topics_answer_404() {
    for request_to_try in [
        get("/topics/ghost"),
        get("/topics/ghost/posts/"),
        request(
            "POST",
            "/topics/ghost/posts/",
            json!({"content": "x", "author": "alice"}),
        ),
        request(
            "PUT",
            "/topics/ghost",
            json!({"title": "t", "description": "d"}),
        ),
        request("DELETE", "/topics/ghost", json!({})),
    ] {
        let response = test_app().oneshot(request_to_try).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
