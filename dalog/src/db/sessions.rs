// サーバー側セッションの永続化

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::common::auth::Session;
use crate::common::error::{CommonError, DalError};

use super::{format_timestamp, parse_timestamp};

/// セッションを作成
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `user_id` - セッションを紐付けるユーザー
/// * `expires_at` - 有効期限
///
/// # Returns
/// * `Ok(Session)` - 作成されたセッション
/// * `Err(DalError)` - 作成失敗
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> Result<Session, DalError> {
    let session = Session {
        id: Uuid::new_v4(),
        user_id,
        created_at: Utc::now(),
        expires_at,
        ended_at: None,
    };

    sqlx::query(
        "INSERT INTO sessions (id, user_id, created_at, expires_at, ended_at)
         VALUES (?, ?, ?, ?, NULL)",
    )
    .bind(session.id.to_string())
    .bind(user_id)
    .bind(format_timestamp(&session.created_at))
    .bind(format_timestamp(&session.expires_at))
    .execute(pool)
    .await
    .map_err(|e| DalError::Database(format!("Failed to create session: {}", e)))?;

    Ok(session)
}

/// IDでセッションを取得（終了済み・期限切れも含む）
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Session>, DalError> {
    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT id, user_id, created_at, expires_at, ended_at FROM sessions WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
    .map_err(|e| DalError::Database(format!("Failed to find session: {}", e)))?;

    row.map(Session::try_from).transpose()
}

/// セッションを終了
///
/// 既に終了済みのセッションや存在しないIDに対しては何もしない。
///
/// # Returns
/// * `Ok(true)` - 今回の呼び出しで終了した
/// * `Ok(false)` - 既に終了済み、または存在しない
pub async fn end(pool: &SqlitePool, id: Uuid) -> Result<bool, DalError> {
    let result = sqlx::query("UPDATE sessions SET ended_at = ? WHERE id = ? AND ended_at IS NULL")
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .execute(pool)
        .await
        .map_err(|e| DalError::Database(format!("Failed to end session: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: String,
    user_id: i64,
    created_at: String,
    expires_at: String,
    ended_at: Option<String>,
}

impl TryFrom<SessionRow> for Session {
    type Error = DalError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&row.id).map_err(CommonError::from)?,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
            expires_at: parse_timestamp(&row.expires_at)?,
            ended_at: row.ended_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}
