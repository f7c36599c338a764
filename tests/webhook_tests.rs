//! The HTTP surface the transport adapter talks to.

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use common::MODERATOR;
use introbot::{AppState, Config, Store, webhook};
use serde_json::{Value, json};
use tower::util::ServiceExt;

async fn setup_app() -> (Router, Store) {
    let store = Store::in_memory().await.unwrap();
    let state = AppState::new(store.clone(), &Config::with_moderator(MODERATOR));
    (webhook::router().with_state(state), store)
}

fn post_event(event: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/events")
        .header("content-type", "application/json")
        .body(Body::from(event.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = setup_app().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn name_event_returns_the_contact_question() {
    let (app, _) = setup_app().await;

    let event = json!({
        "from": {"id": 5},
        "type": "text",
        "message_id": 1,
        "text": "Alice Smith"
    });
    let response = app.oneshot(post_event(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let actions = extract_json(response.into_body()).await;
    assert_eq!(actions[0]["type"], "text");
    assert_eq!(actions[0]["to"], 5);
    assert_eq!(actions[0]["choices"][0]["data"], "contact_yes");
    assert_eq!(actions[0]["choices"][1]["data"], "contact_no");
}

#[tokio::test]
async fn malformed_events_are_rejected() {
    let (app, _) = setup_app().await;

    let response = app
        .oneshot(post_event(&json!({"from": {"id": 5}, "type": "telepathy"})))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn store_failures_surface_as_server_errors() {
    let (app, store) = setup_app().await;
    store.close().await;

    let event = json!({
        "from": {"id": 5},
        "type": "text",
        "message_id": 1,
        "text": "Alice Smith"
    });
    let response = app.oneshot(post_event(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
