//! 表示層に渡すビューモデル
//!
//! コアは表示文字列を組み立てず、構造化データと重要度付きのステータスメッセージだけを返す。

use serde::Serialize;

use crate::common::types::{Dataset, HistoryEntry, UserSummary};

/// ステータスメッセージの重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 成功
    Success,
    /// エラー
    Danger,
    /// 情報
    Info,
    /// 警告（処理は継続）
    Warning,
}

/// ステータスメッセージの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// ログイン成功
    LoggedIn,
    /// ログアウト完了
    LoggedOut,
    /// ユーザー名またはパスワード誤り
    InvalidCredentials,
    /// セッションなし
    LoginRequired,
    /// データセットまたは目的の未入力
    MissingInput,
    /// 選択されたデータセットが存在しない
    DatasetNotFound,
    /// アクセス記録成功
    AccessLogged,
    /// アクセス記録失敗（ロールバック済み）
    LoggingFailed,
    /// 開始日の書式誤り
    InvalidStartDate,
    /// 終了日の書式誤り
    InvalidEndDate,
    /// ユーザーフィルタの書式誤り
    InvalidUserFilter,
    /// 送信内容を読み取れない
    InvalidSubmission,
    /// その他のリクエスト失敗
    RequestFailed,
}

impl NoticeKind {
    /// 重要度を返す
    pub fn severity(self) -> Severity {
        match self {
            Self::LoggedIn | Self::AccessLogged => Severity::Success,
            Self::LoggedOut | Self::LoginRequired => Severity::Info,
            Self::InvalidStartDate | Self::InvalidEndDate => Severity::Warning,
            Self::InvalidCredentials
            | Self::MissingInput
            | Self::DatasetNotFound
            | Self::LoggingFailed
            | Self::InvalidUserFilter
            | Self::InvalidSubmission
            | Self::RequestFailed => Severity::Danger,
        }
    }

    /// 表示用メッセージ
    pub fn message(self) -> &'static str {
        match self {
            Self::LoggedIn => "Logged in successfully!",
            Self::LoggedOut => "You have been logged out.",
            Self::InvalidCredentials => "Invalid username or password.",
            Self::LoginRequired => "Please log in to access this page.",
            Self::MissingInput => "Please select a dataset and provide a purpose.",
            Self::DatasetNotFound => "Selected dataset does not exist.",
            Self::AccessLogged => "Access logged successfully!",
            Self::LoggingFailed => "Error logging access. The entry was not recorded.",
            Self::InvalidStartDate => "Invalid start date format. Please use YYYY-MM-DD.",
            Self::InvalidEndDate => "Invalid end date format. Please use YYYY-MM-DD.",
            Self::InvalidUserFilter => "Invalid user filter. Use a user id or \"all\".",
            Self::InvalidSubmission => "The submitted form could not be read.",
            Self::RequestFailed => "The request could not be completed.",
        }
    }
}

/// ステータスメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// 種別
    pub kind: NoticeKind,
    /// 重要度
    pub severity: Severity,
    /// 表示用メッセージ
    pub message: &'static str,
}

impl From<NoticeKind> for Notice {
    fn from(kind: NoticeKind) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: kind.message(),
        }
    }
}

/// ダッシュボード（データセット選択画面）
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// ログイン中のユーザー
    pub user: UserSummary,
    /// 選択肢となるデータセット
    pub datasets: Vec<Dataset>,
}

/// アクセス履歴画面
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    /// 新しい順のアクセスログ
    pub entries: Vec<HistoryEntry>,
    /// フィルタ用のユーザー一覧
    pub users: Vec<UserSummary>,
    /// 選択中のユーザーフィルタ（入力値そのまま）
    pub selected_user_id: Option<String>,
    /// 選択中の開始日（入力値そのまま）
    pub selected_start_date: Option<String>,
    /// 選択中の終了日（入力値そのまま）
    pub selected_end_date: Option<String>,
    /// 無視されたフィルタなどの警告
    pub notices: Vec<Notice>,
}
