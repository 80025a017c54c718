// データベース接続とマイグレーション実行

use std::str::FromStr;

use crate::common::error::DalError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::SqlitePool;

/// SQLiteデータベース接続プールを作成
///
/// ファイルDBの場合は親ディレクトリとファイルを必要に応じて作成する。
///
/// # Arguments
/// * `database_url` - データベースURL（例: "sqlite:/home/user/.dalog/dalog.db"）
///
/// # Returns
/// * `Ok(SqlitePool)` - 接続プール
/// * `Err(DalError)` - 接続失敗
pub async fn connect(database_url: &str) -> Result<SqlitePool, DalError> {
    let in_memory = database_url.contains(":memory:");

    // SQLiteファイルはディレクトリが存在しないと作成できないため、先に作成しておく
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        if !in_memory {
            let normalized = path.trim_start_matches("//");
            let path_without_params = normalized.split('?').next().unwrap_or(normalized);
            let db_path = std::path::Path::new(path_without_params);
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DalError::Database(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
    }

    let mut options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| DalError::Database(format!("Invalid database URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    SqlitePool::connect_with(options)
        .await
        .map_err(|e| DalError::Database(format!("Failed to connect to database: {}", e)))
}

/// 接続してマイグレーションまで実行
pub async fn initialize_database(database_url: &str) -> Result<SqlitePool, DalError> {
    let pool = connect(database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// マイグレーションを実行（sqlx::migrate!マクロを使用）
///
/// # Arguments
/// * `pool` - データベース接続プール
///
/// # Returns
/// * `Ok(())` - マイグレーション成功
/// * `Err(DalError)` - マイグレーション失敗
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DalError> {
    tracing::info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DalError::Database(format!("Failed to run migrations: {}", e)))?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
