// ユーザーCRUD操作（認証情報ストア）

use crate::common::auth::User;
use crate::common::error::DalError;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{format_timestamp, parse_timestamp};

/// ユーザーを作成
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `username` - ユーザー名
/// * `password_hash` - bcryptハッシュ化されたパスワード
///
/// # Returns
/// * `Ok(User)` - 作成されたユーザー
/// * `Err(DalError)` - 作成失敗（ユーザー名重複など）
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<User, DalError> {
    let created_at = Utc::now();

    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, created_at)
         VALUES (?, ?, ?)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(format_timestamp(&created_at))
    .execute(pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            DalError::Conflict(format!("Username '{}' already exists", username))
        } else {
            DalError::Database(format!("Failed to create user: {}", e))
        }
    })?;

    Ok(User {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        created_at,
    })
}

/// ユーザー名でユーザーを検索（完全一致）
///
/// # Returns
/// * `Ok(Some(User))` - ユーザーが見つかった
/// * `Ok(None)` - ユーザーが見つからなかった
/// * `Err(DalError)` - 検索失敗
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, DalError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|e| DalError::Database(format!("Failed to find user: {}", e)))?;

    row.map(UserRow::into_user).transpose()
}

/// IDでユーザーを検索
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, DalError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| DalError::Database(format!("Failed to find user: {}", e)))?;

    row.map(UserRow::into_user).transpose()
}

/// すべてのユーザーをID順で取得
pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, DalError> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, created_at FROM users ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| DalError::Database(format!("Failed to list users: {}", e)))?;

    rows.into_iter().map(UserRow::into_user).collect()
}

/// パスワードハッシュを更新
///
/// # Returns
/// * `Ok(true)` - 更新成功
/// * `Ok(false)` - ユーザーが存在しない
pub async fn update_password(
    pool: &SqlitePool,
    id: i64,
    password_hash: &str,
) -> Result<bool, DalError> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| DalError::Database(format!("Failed to update password: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

/// ユーザー数を取得
pub async fn count(pool: &SqlitePool) -> Result<i64, DalError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(|e| DalError::Database(format!("Failed to count users: {}", e)))
}

/// 初回起動かチェック（ユーザーが0人）
pub async fn is_first_boot(pool: &SqlitePool) -> Result<bool, DalError> {
    Ok(count(pool).await? == 0)
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, DalError> {
        Ok(User {
            id: self.id,
            username: self.username,
            password_hash: self.password_hash,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}
