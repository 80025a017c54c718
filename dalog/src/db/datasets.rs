// データセットカタログ

use crate::common::error::DalError;
use crate::common::types::Dataset;
use chrono::Utc;
use sqlx::SqlitePool;

use super::format_timestamp;

/// データセットを登録
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `name` - 名前（一意）
/// * `description` - 説明
///
/// # Returns
/// * `Ok(Dataset)` - 登録されたデータセット
/// * `Err(DalError)` - 登録失敗（名前重複など）
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<Dataset, DalError> {
    let result = sqlx::query("INSERT INTO datasets (name, description, created_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(description)
        .bind(format_timestamp(&Utc::now()))
        .execute(pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                DalError::Conflict(format!("Dataset '{}' already exists", name))
            } else {
                DalError::Database(format!("Failed to create dataset: {}", e))
            }
        })?;

    Ok(Dataset {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        description: description.map(str::to_string),
    })
}

/// カタログが空の場合のみ、データセットをまとめて登録（単一トランザクション）
///
/// 件数確認と登録を同じトランザクションで行うため、途中で失敗しても一部だけが残ることはない。
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `entries` - 登録する（名前, 説明）の並び
///
/// # Returns
/// * `Ok(usize)` - 登録した件数（既にデータセットがあれば0）
/// * `Err(DalError)` - 登録失敗（ロールバック済み）
pub async fn create_all_if_empty(
    pool: &SqlitePool,
    entries: &[(&str, &str)],
) -> Result<usize, DalError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DalError::Database(format!("Failed to begin transaction: {}", e)))?;

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM datasets")
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DalError::Database(format!("Failed to count datasets: {}", e)))?;
    if existing > 0 {
        return Ok(0);
    }

    let created_at = format_timestamp(&Utc::now());
    for &(name, description) in entries {
        sqlx::query("INSERT INTO datasets (name, description, created_at) VALUES (?, ?, ?)")
            .bind(name)
            .bind(description)
            .bind(&created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| DalError::Database(format!("Failed to create dataset '{}': {}", name, e)))?;
    }

    tx.commit()
        .await
        .map_err(|e| DalError::Database(format!("Failed to commit datasets: {}", e)))?;

    Ok(entries.len())
}

/// データセット一覧を登録順で取得
pub async fn list(pool: &SqlitePool) -> Result<Vec<Dataset>, DalError> {
    let rows = sqlx::query_as::<_, DatasetRow>(
        "SELECT id, name, description FROM datasets ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| DalError::Database(format!("Failed to list datasets: {}", e)))?;

    Ok(rows.into_iter().map(Dataset::from).collect())
}

/// IDでデータセットを取得
///
/// # Returns
/// * `Ok(Some(Dataset))` - 見つかった
/// * `Ok(None)` - 存在しない
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Dataset>, DalError> {
    let row = sqlx::query_as::<_, DatasetRow>(
        "SELECT id, name, description FROM datasets WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| DalError::Database(format!("Failed to find dataset: {}", e)))?;

    Ok(row.map(Dataset::from))
}

/// データセット数を取得
pub async fn count(pool: &SqlitePool) -> Result<i64, DalError> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM datasets")
        .fetch_one(pool)
        .await
        .map_err(|e| DalError::Database(format!("Failed to count datasets: {}", e)))
}

#[derive(sqlx::FromRow)]
struct DatasetRow {
    id: i64,
    name: String,
    description: Option<String>,
}

impl From<DatasetRow> for Dataset {
    fn from(row: DatasetRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}
