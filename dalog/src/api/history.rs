// アクセス履歴API

use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::error::AppError;
use crate::history::{self, HistoryQuery};
use crate::view::HistoryView;
use crate::AppState;

/// GET /api/history - アクセス履歴
///
/// `user_id`（IDまたは"all"）、`start_date`、`end_date`（YYYY-MM-DD）で絞り込む。
/// 日付の書式誤りは400にせず、`notices`に警告を入れて該当の境界だけを無視する。
///
/// # Returns
/// * `200 OK` - 新しい順のエントリとフィルタ用ユーザー一覧
/// * `400 Bad Request` - ユーザーフィルタが不正
pub async fn get_history(
    State(app_state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryView>, AppError> {
    let view = history::query_history(&app_state.db_pool, &query).await?;
    Ok(Json(view))
}
