//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::common::error::{CommonError, DalError};
use crate::view::Notice;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub DalError);

impl From<DalError> for AppError {
    fn from(err: DalError) -> Self {
        AppError(err)
    }
}

/// JSONボディの読み取り失敗は検証エラーとして共通形式で返す
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(CommonError::Validation(rejection.body_text()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        // 内部の詳細（SQLエラーなど）はログにのみ出力する
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected: {}", self.0);
        }

        let payload = json!({
            "error": self.0.external_message(),
            "type": self.0.error_type(),
            "notice": Notice::from(self.0.notice()),
        });

        (status, Json(payload)).into_response()
    }
}
