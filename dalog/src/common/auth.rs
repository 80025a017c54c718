// 認証関連のデータモデル

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::UserSummary;

/// ユーザー
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// ユーザーID
    pub id: i64,
    /// ユーザー名
    pub username: String,
    /// パスワードハッシュ（bcrypt）
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 作成日時
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 表示用の要約に変換
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// サーバー側セッション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// セッションID
    pub id: Uuid,
    /// ユーザーID
    pub user_id: i64,
    /// 作成日時
    pub created_at: DateTime<Utc>,
    /// 有効期限
    pub expires_at: DateTime<Utc>,
    /// 終了日時（ログアウト済みならSome）
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// 指定時刻において有効か
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.ended_at.is_none() && self.expires_at > now
    }
}

/// 認証済みの呼び出し元
///
/// セッションミドルウェアがリクエスト拡張に格納し、保護されたハンドラーへ明示的に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// ユーザーID
    pub user_id: i64,
    /// ユーザー名
    pub username: String,
    /// セッションID
    pub session_id: Uuid,
    /// セッション有効期限
    pub expires_at: DateTime<Utc>,
}

impl SessionIdentity {
    /// 表示用の要約に変換
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.user_id,
            username: self.username.clone(),
        }
    }
}

/// JWTクレーム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// ユーザーID（JWT sub claim）
    pub sub: String,
    /// セッションID
    pub sid: String,
    /// 有効期限（Unix timestamp、JWT exp claim）
    pub exp: usize,
}
