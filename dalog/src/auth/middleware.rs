// 認証ミドルウェア（セッション検証, CSRF）

use crate::api::error::AppError;
use crate::auth::{session, CSRF_COOKIE, CSRF_HEADER, SESSION_COOKIE};
use crate::common::error::DalError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Cookieヘッダーから指定名の値を取り出す
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    let prefix = format!("{}=", name);
    for part in cookie_header.split(';') {
        if let Some(value) = part.trim().strip_prefix(&prefix) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// リクエストからセッショントークンを取り出す（Bearerヘッダー優先、次にCookie）
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.trim().to_string());
    }
    extract_cookie(headers, SESSION_COOKIE)
}

fn method_requires_csrf(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn expected_origin(headers: &HeaderMap) -> Option<String> {
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|value| value.to_str().ok())?;
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("http");
    Some(format!("{}://{}", proto, host))
}

fn origin_or_referer(headers: &HeaderMap) -> Option<String> {
    if let Some(origin) = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
    {
        return Some(origin.to_string());
    }
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())?;
    let (scheme, rest) = referer.split_once("://")?;
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return None;
    }
    Some(format!("{}://{}", scheme, host))
}

fn origin_matches(headers: &HeaderMap) -> bool {
    match (expected_origin(headers), origin_or_referer(headers)) {
        (Some(expected), Some(provided)) => provided.eq_ignore_ascii_case(&expected),
        _ => false,
    }
}

/// HTTPS経由のリクエストか（リバースプロキシのヘッダーを考慮）
pub fn is_request_secure(headers: &HeaderMap) -> bool {
    if let Some(proto) = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
    {
        if proto.eq_ignore_ascii_case("https") {
            return true;
        }
    }
    headers
        .get("forwarded")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().contains("proto=https"))
        .unwrap_or(false)
}

/// セッション認証ミドルウェア
///
/// セッショントークンを検証し、`SessionIdentity`をリクエスト拡張に格納する。
///
/// # Returns
/// * `Ok(Response)` - 認証成功
/// * `Err(Response)` - 401 Unauthorized（ログインを促すメッセージ付き）
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_session_token(request.headers());

    let identity = session::require_session(&state.db_pool, &state.jwt_secret, token.as_deref())
        .await
        .map_err(|e| {
            tracing::debug!(path = %request.uri().path(), "Session rejected: {}", e);
            AppError(e).into_response()
        })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// CookieベースのセッションにCSRFトークンを要求するミドルウェア
///
/// Bearerヘッダーで認証するクライアントは対象外。
pub async fn csrf_protect_middleware(request: Request, next: Next) -> Result<Response, Response> {
    if !method_requires_csrf(request.method()) {
        return Ok(next.run(request).await);
    }

    if request.headers().contains_key(header::AUTHORIZATION) {
        return Ok(next.run(request).await);
    }

    let forbidden = |reason: &str| AppError(DalError::Forbidden(reason.to_string())).into_response();

    let csrf_cookie =
        extract_cookie(request.headers(), CSRF_COOKIE).ok_or_else(|| forbidden("Missing CSRF cookie"))?;
    let csrf_header = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| forbidden("Missing CSRF header"))?;

    if csrf_cookie != csrf_header {
        return Err(forbidden("Invalid CSRF token"));
    }

    if !origin_matches(request.headers()) {
        return Err(forbidden("Origin validation failed"));
    }

    Ok(next.run(request).await)
}

/// レスポンスにSet-Cookieを追加する
pub(crate) fn append_cookie(response: &mut Response, cookie: String) {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Failed to build Set-Cookie header: {}", e),
    }
}
