//! 初期化からログイン・記録・履歴確認までの一連の流れ

use axum::http::StatusCode;
use axum::Router;
use chrono::Utc;
use dalog::{api, bootstrap};
use serde_json::json;
use serial_test::serial;
use tempfile::TempDir;

use crate::support::app::{login_token, send};

async fn boot() -> (Router, TempDir) {
    for key in [
        "DALOG_ADMIN_USERNAME",
        "DALOG_ADMIN_PASSWORD",
        "ADMIN_USERNAME",
        "ADMIN_PASSWORD",
        "DALOG_JWT_SECRET",
        "SECRET_KEY",
        "DALOG_SESSION_TTL_HOURS",
    ] {
        std::env::remove_var(key);
    }
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("dalog.db").display());
    let state = bootstrap::initialize_with(&url, dir.path()).await.unwrap();
    (api::create_app(state), dir)
}

#[tokio::test]
#[serial]
async fn seeded_admin_records_and_reviews_access() {
    let (app, _dir) = boot().await;
    let token = login_token(&app, "admin", "adminpass").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/access-logs",
        Some(&token),
        Some(json!({ "dataset": "1", "purpose": "quarterly audit" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let entry_id = body["entry"]["id"].clone();
    let admin_id = body["entry"]["user_id"].clone();

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let query = serde_urlencoded::to_string([("start_date", &today), ("end_date", &today)]).unwrap();
    let uri = format!("/api/history?{}", query);
    let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], entry_id);
    assert_eq!(entries[0]["user_id"], admin_id);
    assert_eq!(entries[0]["username"], "admin");
    assert_eq!(entries[0]["dataset_name"], "Customer_Database");
    assert_eq!(entries[0]["purpose"], "quarterly audit");

    let (status, body) =
        send(&app, "GET", "/api/history?user_id=999", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn entries_survive_logout_and_new_login() {
    let (app, _dir) = boot().await;
    let first = login_token(&app, "admin", "adminpass").await;
    for purpose in ["first look", "second look"] {
        let (status, _body) = send(
            &app,
            "POST",
            "/api/access-logs",
            Some(&first),
            Some(json!({ "dataset": 2, "purpose": purpose })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    send(&app, "POST", "/api/auth/logout", Some(&first), None).await;
    let (status, _body) = send(&app, "GET", "/api/history", Some(&first), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let second = login_token(&app, "admin", "adminpass").await;
    let (status, body) = send(&app, "GET", "/api/history", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
    let purposes: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["purpose"].as_str().unwrap())
        .collect();
    assert_eq!(purposes, vec!["second look", "first look"]);
}
