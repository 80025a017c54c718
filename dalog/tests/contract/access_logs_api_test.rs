//! アクセス記録API Contract Tests
//!
//! POST /api/access-logs

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, SubsecRound, Utc};
use dalog::db;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use crate::support::app::{create_test_app, create_user, login_token, send};

struct Fixture {
    app: Router,
    pool: SqlitePool,
    token: String,
    user_id: i64,
    dataset_id: i64,
}

async fn fixture() -> Fixture {
    let (app, pool) = create_test_app().await;
    let user_id = create_user(&pool, "analyst", "analystpass").await;
    let dataset = db::datasets::create(&pool, "Customer_Database", None)
        .await
        .unwrap();
    let token = login_token(&app, "analyst", "analystpass").await;
    Fixture {
        app,
        pool,
        token,
        user_id,
        dataset_id: dataset.id,
    }
}

async fn ledger_size(pool: &SqlitePool) -> i64 {
    db::access_logs::count(pool).await.unwrap()
}

/// 記録成功は201とエントリを返す
#[tokio::test]
async fn test_record_access_success() {
    let f = fixture().await;
    let before = Utc::now().trunc_subsecs(6);

    let (status, body) = send(
        &f.app,
        "POST",
        "/api/access-logs",
        Some(&f.token),
        Some(json!({ "dataset": f.dataset_id, "purpose": "  quarterly audit  " })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["entry"]["user_id"], f.user_id);
    assert_eq!(body["entry"]["dataset_id"], f.dataset_id);
    assert_eq!(body["entry"]["purpose"], "quarterly audit");
    assert_eq!(body["notice"]["kind"], "access_logged");
    assert_eq!(body["notice"]["severity"], "success");
    assert_eq!(body["notice"]["message"], "Access logged successfully!");

    let access_time: DateTime<Utc> = body["entry"]["access_time"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(access_time >= before && access_time <= Utc::now());
    assert_eq!(ledger_size(&f.pool).await, 1);
}

/// 数値文字列のデータセットIDも受け付ける
#[tokio::test]
async fn test_record_access_with_string_dataset_id() {
    let f = fixture().await;
    let (status, _body) = send(
        &f.app,
        "POST",
        "/api/access-logs",
        Some(&f.token),
        Some(json!({ "dataset": f.dataset_id.to_string(), "purpose": "review" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

/// 送信されたuser_idは無視され、常にセッションのユーザーで記録される
#[tokio::test]
async fn test_record_access_ignores_submitted_user_id() {
    let f = fixture().await;
    let other = create_user(&f.pool, "other", "otherpass").await;

    let (status, body) = send(
        &f.app,
        "POST",
        "/api/access-logs",
        Some(&f.token),
        Some(json!({ "dataset": f.dataset_id, "purpose": "review", "user_id": other })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["entry"]["user_id"], f.user_id);
}

/// データセットまたは目的が未入力なら400、何も記録されない
#[tokio::test]
async fn test_record_access_missing_input() {
    let f = fixture().await;
    let cases = [
        json!({ "purpose": "review" }),
        json!({ "dataset": "", "purpose": "review" }),
        json!({ "dataset": f.dataset_id }),
        json!({ "dataset": f.dataset_id, "purpose": "" }),
        json!({ "dataset": f.dataset_id, "purpose": "   " }),
    ];

    for payload in cases {
        let (status, body) = send(
            &f.app,
            "POST",
            "/api/access-logs",
            Some(&f.token),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(body["notice"]["kind"], "missing_input");
        assert_eq!(body["notice"]["severity"], "danger");
    }
    assert_eq!(ledger_size(&f.pool).await, 0);
}

/// 存在しないデータセットは404、何も記録されない
#[tokio::test]
async fn test_record_access_unknown_dataset() {
    let f = fixture().await;
    for dataset in [json!(9999), json!("Customer_Database")] {
        let (status, body) = send(
            &f.app,
            "POST",
            "/api/access-logs",
            Some(&f.token),
            Some(json!({ "dataset": dataset, "purpose": "review" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["notice"]["kind"], "dataset_not_found");
        assert_eq!(body["notice"]["message"], "Selected dataset does not exist.");
    }
    assert_eq!(ledger_size(&f.pool).await, 0);
}

/// セッションなしは401、何も記録されない
#[tokio::test]
async fn test_record_access_requires_session() {
    let f = fixture().await;
    let (status, _body) = send(
        &f.app,
        "POST",
        "/api/access-logs",
        None,
        Some(json!({ "dataset": f.dataset_id, "purpose": "sneaky" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(ledger_size(&f.pool).await, 0);
}

/// ログアウト後のトークンでは記録できない
#[tokio::test]
async fn test_record_access_after_logout_is_rejected() {
    let f = fixture().await;
    send(&f.app, "POST", "/api/auth/logout", Some(&f.token), None).await;

    let (status, _body) = send(
        &f.app,
        "POST",
        "/api/access-logs",
        Some(&f.token),
        Some(json!({ "dataset": f.dataset_id, "purpose": "late" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(ledger_size(&f.pool).await, 0);
}

/// 返却されたエントリは履歴から読み出したものと同一
#[tokio::test]
async fn test_recorded_entry_matches_history() {
    let f = fixture().await;
    let mut recorded = Vec::new();
    for i in 0..5 {
        let (status, body) = send(
            &f.app,
            "POST",
            "/api/access-logs",
            Some(&f.token),
            Some(json!({ "dataset": f.dataset_id, "purpose": format!("audit {}", i) })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        recorded.push(body["entry"].clone());
    }

    let (status, body) = send(&f.app, "GET", "/api/history", Some(&f.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().unwrap();
    for entry in &recorded {
        let stored = entries
            .iter()
            .find(|e| e["id"] == entry["id"])
            .unwrap();
        assert_eq!(stored["access_time"], entry["access_time"]);
        assert_eq!(stored["purpose"], entry["purpose"]);
    }
}

/// 型の合わないJSONは400の共通エラー形式、何も記録されない
#[tokio::test]
async fn test_record_access_malformed_json_uses_error_envelope() {
    let f = fixture().await;
    let cases = [
        json!({ "dataset": 1.5, "purpose": "review" }),
        json!({ "dataset": f.dataset_id, "purpose": 7 }),
        json!(["not", "an", "object"]),
    ];

    for payload in cases {
        let (status, body) = send(
            &f.app,
            "POST",
            "/api/access-logs",
            Some(&f.token),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(body["type"], "invalid_request_error");
        assert_eq!(body["notice"]["kind"], "invalid_submission");
        assert_eq!(body["notice"]["severity"], "danger");
    }
    assert_eq!(ledger_size(&f.pool).await, 0);
}

/// フォームエンコードのボディも共通エラー形式で拒否される
#[tokio::test]
async fn test_record_access_form_body_uses_error_envelope() {
    let f = fixture().await;
    let form = serde_urlencoded::to_string([
        ("dataset", f.dataset_id.to_string()),
        ("purpose", "review".to_string()),
    ])
    .unwrap();

    let response = f
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/access-logs")
                .header("authorization", format!("Bearer {}", f.token))
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["notice"]["kind"], "invalid_submission");
    assert_eq!(ledger_size(&f.pool).await, 0);
}
