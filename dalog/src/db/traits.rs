//! Repository traitパターン定義
//!
//! DB操作を抽象化し、テスタビリティを向上させるためのtrait群。
//! 各traitは既存のフリー関数に対応し、`SqlitePool`が実装する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::common::auth::{Session, User};
use crate::common::error::DalError;
use crate::common::types::{AccessLogEntry, Dataset, HistoryEntry};
use crate::history::HistoryFilter;

// ---------------------------------------------------------------------------
// UserRepository
// ---------------------------------------------------------------------------

/// ユーザーCRUD操作のRepository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを作成
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, DalError>;
    /// ユーザー名でユーザーを検索
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DalError>;
    /// IDでユーザーを検索
    async fn find_user(&self, id: i64) -> Result<Option<User>, DalError>;
    /// ユーザー一覧を取得
    async fn list_users(&self) -> Result<Vec<User>, DalError>;
    /// パスワードハッシュを更新
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, DalError>;
    /// ユーザー数を取得
    async fn count_users(&self) -> Result<i64, DalError>;
}

// ---------------------------------------------------------------------------
// DatasetRepository
// ---------------------------------------------------------------------------

/// データセットカタログのRepository trait
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// データセットを登録
    async fn create_dataset(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Dataset, DalError>;
    /// データセット一覧を取得
    async fn list_datasets(&self) -> Result<Vec<Dataset>, DalError>;
    /// IDでデータセットを取得
    async fn find_dataset(&self, id: i64) -> Result<Option<Dataset>, DalError>;
    /// データセット数を取得
    async fn count_datasets(&self) -> Result<i64, DalError>;
}

// ---------------------------------------------------------------------------
// LedgerRepository
// ---------------------------------------------------------------------------

/// アクセスログ台帳のRepository trait（追記と取得のみ）
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// エントリを追記
    async fn append_entry(
        &self,
        user_id: i64,
        dataset_id: i64,
        access_time: DateTime<Utc>,
        purpose: &str,
    ) -> Result<AccessLogEntry, DalError>;
    /// フィルタに一致するエントリを新しい順で取得
    async fn query_entries(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>, DalError>;
}

// ---------------------------------------------------------------------------
// SessionRepository
// ---------------------------------------------------------------------------

/// サーバー側セッションのRepository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを作成
    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DalError>;
    /// IDでセッションを取得
    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, DalError>;
    /// セッションを終了（冪等）
    async fn end_session(&self, id: Uuid) -> Result<bool, DalError>;
}

// ---------------------------------------------------------------------------
// SqlitePool implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl UserRepository for SqlitePool {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, DalError> {
        super::users::create(self, username, password_hash).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DalError> {
        super::users::find_by_username(self, username).await
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, DalError> {
        super::users::find_by_id(self, id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, DalError> {
        super::users::list(self).await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, DalError> {
        super::users::update_password(self, id, password_hash).await
    }

    async fn count_users(&self) -> Result<i64, DalError> {
        super::users::count(self).await
    }
}

#[async_trait]
impl DatasetRepository for SqlitePool {
    async fn create_dataset(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Dataset, DalError> {
        super::datasets::create(self, name, description).await
    }

    async fn list_datasets(&self) -> Result<Vec<Dataset>, DalError> {
        super::datasets::list(self).await
    }

    async fn find_dataset(&self, id: i64) -> Result<Option<Dataset>, DalError> {
        super::datasets::find_by_id(self, id).await
    }

    async fn count_datasets(&self) -> Result<i64, DalError> {
        super::datasets::count(self).await
    }
}

#[async_trait]
impl LedgerRepository for SqlitePool {
    async fn append_entry(
        &self,
        user_id: i64,
        dataset_id: i64,
        access_time: DateTime<Utc>,
        purpose: &str,
    ) -> Result<AccessLogEntry, DalError> {
        super::access_logs::append(self, user_id, dataset_id, access_time, purpose).await
    }

    async fn query_entries(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>, DalError> {
        super::access_logs::query(self, filter).await
    }
}

#[async_trait]
impl SessionRepository for SqlitePool {
    async fn create_session(
        &self,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, DalError> {
        super::sessions::create(self, user_id, expires_at).await
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<Session>, DalError> {
        super::sessions::find_by_id(self, id).await
    }

    async fn end_session(&self, id: Uuid) -> Result<bool, DalError> {
        super::sessions::end(self, id).await
    }
}

// ---------------------------------------------------------------------------
// In-memory store for unit tests
// ---------------------------------------------------------------------------
