//! アクセスログ台帳ストレージ
//!
//! 追記と絞り込み取得のみを提供する。更新・削除はスキーマのトリガーでも拒否される。

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::SqlitePool;

use crate::common::error::{DalError, DalResult};
use crate::common::types::{AccessLogEntry, HistoryEntry};
use crate::history::HistoryFilter;

use super::{format_timestamp, parse_timestamp};

/// エントリを1件追記（単一トランザクション）
///
/// 失敗時はトランザクションを破棄するため、部分的なエントリは残らない。
/// 時刻は保存形式の精度（マイクロ秒）に切り詰めたうえで記録し、返却する。
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `user_id` - 記録するユーザー
/// * `dataset_id` - 参照するデータセット
/// * `access_time` - アクセス時刻
/// * `purpose` - アクセス目的
///
/// # Returns
/// * `Ok(AccessLogEntry)` - 追記されたエントリ
/// * `Err(DalError::Persistence)` - 書き込み失敗（ロールバック済み）
pub async fn append(
    pool: &SqlitePool,
    user_id: i64,
    dataset_id: i64,
    access_time: DateTime<Utc>,
    purpose: &str,
) -> DalResult<AccessLogEntry> {
    let access_time = access_time.trunc_subsecs(6);
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DalError::Persistence(format!("Failed to begin transaction: {}", e)))?;

    let result = sqlx::query(
        "INSERT INTO access_logs (user_id, dataset_id, access_time, purpose) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(dataset_id)
    .bind(format_timestamp(&access_time))
    .bind(purpose)
    .execute(&mut *tx)
    .await
    .map_err(|e| DalError::Persistence(format!("Failed to insert access log: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| DalError::Persistence(format!("Failed to commit access log: {}", e)))?;

    Ok(AccessLogEntry {
        id: result.last_insert_rowid(),
        user_id,
        dataset_id,
        access_time,
        purpose: purpose.to_string(),
    })
}

/// フィルタに一致するエントリを新しい順で取得
///
/// 同時刻のエントリは後から挿入されたものが先に並ぶ。
pub async fn query(pool: &SqlitePool, filter: &HistoryFilter) -> DalResult<Vec<HistoryEntry>> {
    let (where_clause, bind_values) = build_where_clause(filter);
    let sql = format!(
        "SELECT l.id, l.user_id, u.username, l.dataset_id, d.name AS dataset_name, \
         l.access_time, l.purpose \
         FROM access_logs l \
         JOIN users u ON u.id = l.user_id \
         JOIN datasets d ON d.id = l.dataset_id \
         {} ORDER BY l.access_time DESC, l.id DESC",
        where_clause
    );

    let mut query = sqlx::query_as::<_, HistoryRow>(&sql);
    for value in &bind_values {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
        };
    }

    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|e| DalError::Database(format!("Failed to query access logs: {}", e)))?;

    rows.into_iter().map(HistoryEntry::try_from).collect()
}

/// 台帳の総件数
pub async fn count(pool: &SqlitePool) -> DalResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM access_logs")
        .fetch_one(pool)
        .await
        .map_err(|e| DalError::Database(format!("Failed to count access logs: {}", e)))
}

enum BindValue {
    Int(i64),
    Text(String),
}

/// フィルタからWHERE句とバインド値を構築
fn build_where_clause(filter: &HistoryFilter) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<&'static str> = Vec::new();
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(user_id) = filter.user_id {
        conditions.push("l.user_id = ?");
        bind_values.push(BindValue::Int(user_id));
    }

    if let Some(ref start) = filter.start {
        conditions.push("l.access_time >= ?");
        bind_values.push(BindValue::Text(format_timestamp(start)));
    }

    if let Some(ref end) = filter.end_exclusive {
        conditions.push("l.access_time < ?");
        bind_values.push(BindValue::Text(format_timestamp(end)));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    user_id: i64,
    username: String,
    dataset_id: i64,
    dataset_name: String,
    access_time: String,
    purpose: String,
}

impl TryFrom<HistoryRow> for HistoryEntry {
    type Error = DalError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            dataset_id: row.dataset_id,
            dataset_name: row.dataset_name,
            access_time: parse_timestamp(&row.access_time)?,
            purpose: row.purpose,
        })
    }
}
