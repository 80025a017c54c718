// データセットカタログAPI

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::error::AppError;
use crate::common::error::DalError;
use crate::common::types::Dataset;
use crate::db::traits::DatasetRepository;
use crate::AppState;

/// GET /api/datasets - データセット一覧（登録順）
pub async fn list_datasets(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Dataset>>, AppError> {
    Ok(Json(app_state.db_pool.list_datasets().await?))
}

/// GET /api/datasets/{id} - データセット取得
///
/// # Returns
/// * `200 OK` - データセット
/// * `404 Not Found` - 存在しない
pub async fn get_dataset(
    State(app_state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Dataset>, AppError> {
    let dataset = app_state
        .db_pool
        .find_dataset(id)
        .await?
        .ok_or_else(|| DalError::DatasetNotFound(id.to_string()))?;
    Ok(Json(dataset))
}
