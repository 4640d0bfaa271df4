//! Admin ban and broadcast tests.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use stackit_types::models::Role;

#[tokio::test]
async fn non_admin_cannot_ban() {
    let app = TestApp::new();
    let target = app.user("target");
    let regular = app.user("regular");

    let (status, body) = app
        .post("/admin/ban", json!({ "user_id": target, "admin_id": regular }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "Admin access required");
    assert_eq!(app.db.get_user_by_id(target).unwrap().unwrap().role, Role::User);

    let (status, _) = app
        .post("/admin/ban", json!({ "user_id": target, "admin_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    assert_eq!(app.db.get_user_by_id(target).unwrap().unwrap().role, Role::User);
}

#[tokio::test]
async fn missing_admin_id_is_a_bad_request() {
    let app = TestApp::new();
    let target = app.user("target");

    let (status, body) = app.post("/admin/ban", json!({ "user_id": target })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "admin_id required");
    assert_eq!(app.db.get_user_by_id(target).unwrap().unwrap().role, Role::User);

    let (status, body) = app.post("/admin/message", json!({ "message": "hi" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "admin_id required");
    assert!(app.db.notifications_for_user(target).unwrap().is_empty());
}

#[tokio::test]
async fn admin_bans_user() {
    let app = TestApp::new();
    let admin = app.admin("root");
    let target = app.user("target");

    let (status, body) = app
        .post("/admin/ban", json!({ "user_id": target, "admin_id": admin }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "User banned");
    assert_eq!(app.db.get_user_by_id(target).unwrap().unwrap().role, Role::Banned);
}

#[tokio::test]
async fn banning_unknown_user_is_not_found() {
    let app = TestApp::new();
    let admin = app.admin("root");

    let (status, _) = app
        .post("/admin/ban", json!({ "user_id": 555, "admin_id": admin }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn banned_admin_loses_privileges() {
    let app = TestApp::new();
    let admin = app.admin("root");
    let other_admin = app.admin("deputy");
    let target = app.user("target");

    app.post("/admin/ban", json!({ "user_id": other_admin, "admin_id": admin }))
        .await;

    let (status, _) = app
        .post("/admin/ban", json!({ "user_id": target, "admin_id": other_admin }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn broadcast_reaches_everyone_not_banned() {
    let app = TestApp::new();
    let admin = app.admin("root");
    let alice = app.user("alice");
    let mallory = app.user("mallory");
    app.db.set_user_role(mallory, Role::Banned).unwrap();

    let (status, body) = app
        .post("/admin/message", json!({ "message": "Maintenance at noon", "admin_id": admin }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Message sent to 2 users");

    for user in [admin, alice] {
        let rows = app.db.notifications_for_user(user).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message, "Maintenance at noon");
    }
    assert!(app.db.notifications_for_user(mallory).unwrap().is_empty());
}

#[tokio::test]
async fn broadcast_requires_admin_and_message() {
    let app = TestApp::new();
    let admin = app.admin("root");
    let alice = app.user("alice");

    let (status, _) = app
        .post("/admin/message", json!({ "message": "hi", "admin_id": alice }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.db.notifications_for_user(alice).unwrap().is_empty());

    let (status, _) = app.post("/admin/message", json!({ "admin_id": admin })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
