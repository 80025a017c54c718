//! 認証API
//!
//! ログイン・ログアウト・認証情報確認

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error::AppError;
use crate::auth::middleware::{append_cookie, is_request_secure};
use crate::auth::{self, session};
use crate::common::auth::SessionIdentity;
use crate::common::types::UserSummary;
use crate::view::{Notice, NoticeKind};
use crate::AppState;

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// ユーザー名
    pub username: String,
    /// パスワード
    pub password: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// セッションJWT
    pub token: String,
    /// 有効期限（秒）
    pub expires_in: usize,
    /// ログインしたユーザー
    pub user: UserSummary,
    /// ステータスメッセージ
    pub notice: Notice,
}

/// 認証情報レスポンス
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// ログイン中のユーザー
    pub user: UserSummary,
    /// セッション有効期限
    pub expires_at: DateTime<Utc>,
}

/// ステータスメッセージのみのレスポンス
#[derive(Debug, Serialize)]
pub struct NoticeResponse {
    /// ステータスメッセージ
    pub notice: Notice,
}

/// POST /api/auth/login - ログイン
///
/// ユーザー名とパスワードで認証し、セッションを開始してJWTを発行
///
/// # Returns
/// * `200 OK` - ログイン成功（JWT token, Cookie）
/// * `400 Bad Request` - ボディを読み取れない
/// * `401 Unauthorized` - 認証失敗
/// * `500 Internal Server Error` - サーバーエラー
pub async fn login(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let is_secure = is_request_secure(&headers);

    let issued = session::authenticate(
        &app_state.db_pool,
        &app_state.jwt_secret,
        &app_state.session,
        &request.username,
        &request.password,
    )
    .await?;

    let expires_in = app_state.session.ttl_secs();
    let mut response = (
        StatusCode::OK,
        Json(LoginResponse {
            token: issued.token.clone(),
            expires_in,
            user: issued.identity.summary(),
            notice: Notice::from(NoticeKind::LoggedIn),
        }),
    )
        .into_response();

    append_cookie(
        &mut response,
        auth::build_session_cookie(&issued.token, expires_in, is_secure),
    );
    append_cookie(
        &mut response,
        auth::build_csrf_cookie(&auth::generate_random_token(32), expires_in, is_secure),
    );
    Ok(response)
}

/// POST /api/auth/logout - ログアウト
///
/// サーバー側のセッションを終了し、Cookieを削除する。以後同じトークンは使えない。
///
/// # Returns
/// * `200 OK` - ログアウト成功
/// * `401 Unauthorized` - セッションなし
pub async fn logout(
    State(app_state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    session::end_session(&app_state.db_pool, &identity).await?;

    let is_secure = is_request_secure(&headers);
    let mut response = Json(NoticeResponse {
        notice: Notice::from(NoticeKind::LoggedOut),
    })
    .into_response();
    append_cookie(&mut response, auth::clear_session_cookie(is_secure));
    append_cookie(&mut response, auth::clear_csrf_cookie(is_secure));
    Ok(response)
}

/// GET /api/auth/me - 認証情報確認
pub async fn me(Extension(identity): Extension<SessionIdentity>) -> Json<MeResponse> {
    Json(MeResponse {
        user: identity.summary(),
        expires_at: identity.expires_at,
    })
}
