//! データセット・アクセスログの型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// データセット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// データセットID
    pub id: i64,
    /// 名前（一意）
    pub name: String,
    /// 説明
    pub description: Option<String>,
}

/// アクセスログ台帳の1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    /// エントリID（挿入順に単調増加）
    pub id: i64,
    /// 記録したユーザー
    pub user_id: i64,
    /// 参照されたデータセット
    pub dataset_id: i64,
    /// アクセス時刻（UTC）
    pub access_time: DateTime<Utc>,
    /// アクセス目的
    pub purpose: String,
}

/// ユーザー名・データセット名を解決済みの履歴行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// エントリID
    pub id: i64,
    /// ユーザーID
    pub user_id: i64,
    /// ユーザー名
    pub username: String,
    /// データセットID
    pub dataset_id: i64,
    /// データセット名
    pub dataset_name: String,
    /// アクセス時刻（UTC）
    pub access_time: DateTime<Utc>,
    /// アクセス目的
    pub purpose: String,
}

/// フィルタ用のユーザー要約
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// ユーザーID
    pub id: i64,
    /// ユーザー名
    pub username: String,
}
