//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

use chrono::{DateTime, SecondsFormat, Utc};

use crate::common::error::DalError;

/// ユーザー管理（認証情報ストア）
pub mod users;

/// データセットカタログ
pub mod datasets;

/// アクセスログ台帳
pub mod access_logs;

/// サーバー側セッション
pub mod sessions;

/// データベースマイグレーション
pub mod migrations;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;

/// タイムスタンプを保存用の文字列に変換
///
/// 固定桁（マイクロ秒, `Z`終端）にすることで、TEXT列の辞書順比較が時系列比較と一致する。
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 保存済みタイムスタンプ文字列を解析
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DalError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DalError::Database(format!("Invalid timestamp '{}': {}", value, e)))
}
