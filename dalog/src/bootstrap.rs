//! サーバー初期化ロジック
//!
//! データディレクトリ、DB接続、マイグレーション、初期データ投入、JWTシークレットを
//! 準備して`AppState`を組み立てる。

use std::path::Path;

use tracing::info;

use crate::common::error::DalResult;
use crate::config::{self, SessionConfig};
use crate::db::migrations;
use crate::jwt_secret::get_or_create_jwt_secret;
use crate::seed::{self, SeedReport};
use crate::AppState;

/// 環境変数の設定でサーバー状態を初期化する
pub async fn initialize() -> DalResult<AppState> {
    initialize_with(&config::database_url(), &config::data_dir()).await
}

/// 指定したDBとデータディレクトリでサーバー状態を初期化する
///
/// # Arguments
/// * `database_url` - SQLite接続URL
/// * `data_dir` - JWTシークレットなどを置くディレクトリ
///
/// # Returns
/// * `Ok(AppState)` - 初期化済みの状態
/// * `Err(DalError)` - DB接続・マイグレーション・投入・シークレット生成のいずれかが失敗
pub async fn initialize_with(database_url: &str, data_dir: &Path) -> DalResult<AppState> {
    info!("Data access log v{}", env!("CARGO_PKG_VERSION"));

    let db_pool = migrations::initialize_database(database_url).await?;
    info!("Database ready");

    let report = seed::seed_defaults(&db_pool).await?;
    log_seed_report(&report);

    let jwt_secret = get_or_create_jwt_secret(data_dir)?;
    let session = SessionConfig::from_env();
    info!("Session lifetime: {} hours", session.ttl.num_hours());

    Ok(AppState {
        db_pool,
        jwt_secret,
        session,
    })
}

/// 初期データ投入のみを実行する（`dalog seed`）
pub async fn seed_only(database_url: &str) -> DalResult<SeedReport> {
    let pool = migrations::initialize_database(database_url).await?;
    let report = seed::seed_defaults(&pool).await?;
    log_seed_report(&report);
    pool.close().await;
    Ok(report)
}

fn log_seed_report(report: &SeedReport) {
    match &report.admin_created {
        Some(username) => info!("Admin user ready: {}", username),
        None => info!("Users already present, admin not created"),
    }
    if report.datasets_created > 0 {
        info!("Seeded {} sample datasets", report.datasets_created);
    }
}
