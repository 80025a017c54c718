//! セッションゲート
//!
//! ログインで認証情報を検証してサーバー側セッションを発行し、保護された操作の前に
//! セッションを検証する。ログアウトはセッションを終了させ、以後そのトークンは通らない。

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{jwt, password};
use crate::common::auth::SessionIdentity;
use crate::common::error::{DalError, DalResult};
use crate::config::SessionConfig;
use crate::db::traits::{SessionRepository, UserRepository};

/// ログイン成功時に返すセッション
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// 認証済みの呼び出し元
    pub identity: SessionIdentity,
    /// セッションJWT
    pub token: String,
}

/// ユーザー名とパスワードでログインする
///
/// 存在しないユーザーとパスワード誤りは区別せず`InvalidCredentials`を返す。
///
/// # Arguments
/// * `repo` - ユーザーとセッションのRepository
/// * `jwt_secret` - JWT署名用シークレット
/// * `config` - セッション有効期間
/// * `username` - ユーザー名
/// * `password` - 平文パスワード
///
/// # Returns
/// * `Ok(IssuedSession)` - 新しいセッションとトークン
/// * `Err(DalError::InvalidCredentials)` - 認証失敗
pub async fn authenticate<R>(
    repo: &R,
    jwt_secret: &str,
    config: &SessionConfig,
    username: &str,
    password: &str,
) -> DalResult<IssuedSession>
where
    R: UserRepository + SessionRepository + ?Sized,
{
    let user = match repo.find_by_username(username).await? {
        Some(user) => user,
        None => {
            tracing::info!(username = %username, "Login failed: unknown user");
            return Err(DalError::InvalidCredentials);
        }
    };

    if !password::verify_password(password, &user.password_hash)? {
        tracing::info!(username = %username, "Login failed: wrong password");
        return Err(DalError::InvalidCredentials);
    }

    let expires_at = Utc::now() + config.ttl;
    let session = repo.create_session(user.id, expires_at).await?;
    let token = jwt::create_jwt(user.id, session.id, session.expires_at, jwt_secret)?;

    tracing::info!(user_id = user.id, session_id = %session.id, "Session started");

    Ok(IssuedSession {
        identity: SessionIdentity {
            user_id: user.id,
            username: user.username,
            session_id: session.id,
            expires_at: session.expires_at,
        },
        token,
    })
}

/// トークンから有効なセッションを解決する
///
/// トークンなし・署名不正・未知のセッション・終了済み・期限切れ・ユーザー削除済みは
/// すべて`Unauthenticated`になる。
pub async fn require_session<R>(
    repo: &R,
    jwt_secret: &str,
    token: Option<&str>,
) -> DalResult<SessionIdentity>
where
    R: UserRepository + SessionRepository + ?Sized,
{
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DalError::Unauthenticated("No session token".to_string()))?;

    let claims = jwt::verify_jwt(token, jwt_secret)
        .map_err(|e| DalError::Unauthenticated(e.to_string()))?;

    let session_id = Uuid::parse_str(&claims.sid)
        .map_err(|_| DalError::Unauthenticated("Malformed session id".to_string()))?;
    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| DalError::Unauthenticated("Malformed subject".to_string()))?;

    let session = repo
        .find_session(session_id)
        .await?
        .ok_or_else(|| DalError::Unauthenticated("Unknown session".to_string()))?;

    if session.user_id != user_id {
        return Err(DalError::Unauthenticated(
            "Session does not belong to token subject".to_string(),
        ));
    }
    if !session.is_active_at(Utc::now()) {
        return Err(DalError::Unauthenticated(
            "Session ended or expired".to_string(),
        ));
    }

    let user = repo
        .find_user(user_id)
        .await?
        .ok_or_else(|| DalError::Unauthenticated("User no longer exists".to_string()))?;

    Ok(SessionIdentity {
        user_id: user.id,
        username: user.username,
        session_id: session.id,
        expires_at: session.expires_at,
    })
}

/// セッションを終了する（何度呼んでも同じ結果）
pub async fn end_session<R>(repo: &R, identity: &SessionIdentity) -> DalResult<()>
where
    R: SessionRepository + ?Sized,
{
    if repo.end_session(identity.session_id).await? {
        tracing::info!(
            user_id = identity.user_id,
            session_id = %identity.session_id,
            "Session ended"
        );
    }
    Ok(())
}
