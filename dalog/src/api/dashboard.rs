// ダッシュボードAPI

use axum::{extract::State, Extension, Json};

use crate::api::error::AppError;
use crate::common::auth::SessionIdentity;
use crate::db::traits::DatasetRepository;
use crate::view::DashboardView;
use crate::AppState;

/// GET /api/dashboard - データセット選択画面
///
/// # Returns
/// * `200 OK` - ログイン中のユーザーとデータセット一覧
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> Result<Json<DashboardView>, AppError> {
    let datasets = app_state.db_pool.list_datasets().await?;
    Ok(Json(DashboardView {
        user: identity.summary(),
        datasets,
    }))
}
