//! REST APIハンドラー
//!
//! ルーターの組み立てとハンドラー群

/// アクセス記録API
pub mod access_logs;
/// 認証API
pub mod auth;
/// ダッシュボードAPI
pub mod dashboard;
/// データセットカタログAPI
pub mod datasets;
/// APIエラーレスポンス
pub mod error;
/// アクセス履歴API
pub mod history;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::{csrf_protect_middleware, session_auth_middleware};
use crate::AppState;

/// アプリケーションのルーターを作成
///
/// 保護されたルートはセッション検証（外側）とCSRF検証（内側）を通る。
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/datasets", get(datasets::list_datasets))
        .route("/api/datasets/{id}", get(datasets::get_dataset))
        .route("/api/access-logs", post(access_logs::record_access))
        .route("/api/history", get(history::get_history))
        .route_layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    session_auth_middleware,
                ))
                .layer(middleware::from_fn(csrf_protect_middleware)),
        );

    let public = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/health", get(health));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/health - 稼働確認
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
