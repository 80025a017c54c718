//! Data access log server
//!
//! データセットへのアクセス目的を追記専用の台帳に記録し、監査用の履歴を提供する

#![warn(missing_docs)]

/// 共通型定義
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 認証・セッション管理
pub mod auth;

/// サーバー初期化
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// アクセス履歴の絞り込み
pub mod history;

/// JWT秘密鍵管理
pub mod jwt_secret;

/// アクセスログ台帳
pub mod ledger;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 初期データ投入
pub mod seed;

/// axumサーバー起動
pub mod server;

/// 表示層向けビューモデル
pub mod view;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// JWT署名用シークレット
    pub jwt_secret: String,
    /// セッション設定
    pub session: config::SessionConfig,
}
