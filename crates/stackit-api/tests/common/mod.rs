//! Shared harness for router tests: an in-memory database behind the real
//! router, driven with `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use stackit_api::notify::NotificationSink;
use stackit_api::state::{AppState, AppStateInner};
use stackit_db::Database;
use stackit_db::models::NotificationRow;
use stackit_types::models::Role;

pub const JWT_SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
}

impl TestApp {
    /// Must be called inside a Tokio runtime (the notification worker is spawned).
    pub fn new() -> Self {
        let db = Arc::new(Database::open_in_memory().expect("failed to open database"));
        let (notifier, _worker) = NotificationSink::spawn(db.clone());
        let state: AppState = Arc::new(AppStateInner {
            db: db.clone(),
            jwt_secret: JWT_SECRET.to_string(),
            notifier,
        });

        Self {
            router: stackit_api::router(state),
            db,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("failed to make request");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = String::from_utf8(bytes.to_vec()).expect("response body is not UTF-8");
        (status, body)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn get_json(&self, uri: &str) -> Value {
        let (status, body) = self.get(uri).await;
        assert_eq!(status, StatusCode::OK, "GET {} failed: {}", uri, body);
        serde_json::from_str(&body).expect("response should be valid JSON")
    }

    /// Insert a user directly, skipping password hashing.
    pub fn user(&self, username: &str) -> i64 {
        self.db
            .create_user(username, "not-a-real-hash", Role::User)
            .unwrap()
            .expect("username already taken")
    }

    pub fn admin(&self, username: &str) -> i64 {
        self.db.ensure_admin(username, "not-a-real-hash").unwrap()
    }

    pub async fn question(&self, user_id: i64, title: &str) -> i64 {
        let (status, body) = self
            .post("/questions", serde_json::json!({ "title": title, "user_id": user_id }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        created_id(&body)
    }

    pub async fn answer(&self, question_id: i64, user_id: i64, content: &str) -> i64 {
        let (status, body) = self
            .post(
                &format!("/questions/{}/answers", question_id),
                serde_json::json!({ "content": content, "user_id": user_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        created_id(&body)
    }

    /// Poll until `user_id` has at least `count` notifications or give up.
    pub async fn wait_for_notifications(&self, user_id: i64, count: usize) -> Vec<NotificationRow> {
        for _ in 0..100 {
            let rows = self.db.notifications_for_user(user_id).unwrap();
            if rows.len() >= count {
                return rows;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.db.notifications_for_user(user_id).unwrap()
    }
}

pub fn created_id(body: &str) -> i64 {
    let value: Value = serde_json::from_str(body).expect("creation response should be JSON");
    value["id"].as_i64().expect("creation response should carry a numeric id")
}
