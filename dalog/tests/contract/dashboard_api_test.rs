//! ダッシュボード・データセットAPI Contract Tests
//!
//! GET /api/dashboard, GET /api/datasets, GET /api/datasets/{id}

use axum::http::StatusCode;
use axum::Router;
use dalog::seed;

use crate::support::app::{create_test_app, create_user, login_token, send};

async fn build_app() -> (Router, String) {
    let (app, pool) = create_test_app().await;
    create_user(&pool, "viewer", "viewerpass").await;
    seed::ensure_sample_datasets(&pool).await.unwrap();
    let token = login_token(&app, "viewer", "viewerpass").await;
    (app, token)
}

/// ダッシュボードはユーザーとデータセット一覧を返す
#[tokio::test]
async fn test_dashboard_lists_datasets() {
    let (app, token) = build_app().await;
    let (status, body) = send(&app, "GET", "/api/dashboard", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "viewer");
    let datasets = body["datasets"].as_array().unwrap();
    assert_eq!(datasets.len(), 4);
    assert_eq!(datasets[0]["name"], "Customer_Database");
    assert_eq!(
        datasets[0]["description"],
        "Contains customer personal and order information."
    );
}

/// データセット一覧は登録順
#[tokio::test]
async fn test_list_datasets_in_insertion_order() {
    let (app, token) = build_app().await;
    let (status, body) = send(&app, "GET", "/api/datasets", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "Customer_Database",
            "Sales_Figures_Q1_2024",
            "Marketing_Campaign_Results",
            "Product_Inventory"
        ]
    );
}

/// IDでデータセットを取得、存在しなければ404
#[tokio::test]
async fn test_get_dataset_by_id() {
    let (app, token) = build_app().await;
    let (status, body) = send(&app, "GET", "/api/datasets/2", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sales_Figures_Q1_2024");

    let (status, body) = send(&app, "GET", "/api/datasets/404", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["notice"]["kind"], "dataset_not_found");
}

/// 保護されたルートはすべてセッションが必要
#[tokio::test]
async fn test_protected_routes_require_session() {
    let (app, _token) = build_app().await;
    for (method, uri) in [
        ("GET", "/api/dashboard"),
        ("GET", "/api/datasets"),
        ("GET", "/api/datasets/1"),
        ("GET", "/api/history"),
        ("GET", "/api/auth/me"),
        ("POST", "/api/auth/logout"),
        ("POST", "/api/access-logs"),
    ] {
        let (status, _body) = send(&app, method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}
