//! アクセス記録API

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use crate::api::error::AppError;
use crate::common::auth::SessionIdentity;
use crate::common::types::AccessLogEntry;
use crate::ledger::{self, RecordAccessForm, RecordAccessInput};
use crate::view::{Notice, NoticeKind};
use crate::AppState;

/// アクセス記録レスポンス
#[derive(Debug, Serialize)]
pub struct RecordAccessResponse {
    /// 追記されたエントリ
    pub entry: AccessLogEntry,
    /// ステータスメッセージ
    pub notice: Notice,
}

/// POST /api/access-logs - アクセスを記録
///
/// # Returns
/// * `201 Created` - 記録成功
/// * `400 Bad Request` - データセットまたは目的が未入力、またはボディを読み取れない
/// * `404 Not Found` - データセットが存在しない
/// * `500 Internal Server Error` - 書き込み失敗（何も記録されていない）
pub async fn record_access(
    State(app_state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    payload: Result<Json<RecordAccessForm>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordAccessResponse>), AppError> {
    let Json(form) = payload?;
    let input = RecordAccessInput::parse(form)?;
    let entry = ledger::record_access(&app_state.db_pool, &identity, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordAccessResponse {
            entry,
            notice: Notice::from(NoticeKind::AccessLogged),
        }),
    ))
}
