//! 初回起動時の管理者アカウント作成
//!
//! ユーザーが1人もいない場合のみ、環境変数（未設定ならデフォルト値）で管理者を作成する。

use crate::auth::password::hash_password;
use crate::common::error::DalError;
use crate::config::get_env_with_fallback;
use crate::db;

/// 管理者ユーザー名のデフォルト
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// 管理者パスワードのデフォルト
pub const DEFAULT_ADMIN_PASSWORD: &str = "adminpass";

/// 環境変数から管理者の認証情報を読み込む
///
/// # Environment Variables
/// * `DALOG_ADMIN_USERNAME` - 管理者ユーザー名（省略時: "admin"）
/// * `DALOG_ADMIN_PASSWORD` - 管理者パスワード（省略時: "adminpass"）
fn admin_credentials_from_env() -> (String, String) {
    let username = get_env_with_fallback("DALOG_ADMIN_USERNAME", "ADMIN_USERNAME")
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());

    let password = match get_env_with_fallback("DALOG_ADMIN_PASSWORD", "ADMIN_PASSWORD") {
        Some(p) if !p.is_empty() => p,
        _ => {
            tracing::warn!(
                "DALOG_ADMIN_PASSWORD not set, using the default admin password. Change it before exposing the service."
            );
            DEFAULT_ADMIN_PASSWORD.to_string()
        }
    };

    (username, password)
}

/// 初回起動なら管理者を作成
///
/// # Returns
/// * `Ok(Some(username))` - 今回作成した、または既に同名ユーザーが存在した
/// * `Ok(None)` - ユーザーが既に存在するため何もしなかった
/// * `Err(DalError)` - 作成失敗
pub async fn ensure_admin_exists(pool: &sqlx::SqlitePool) -> Result<Option<String>, DalError> {
    if !db::users::is_first_boot(pool).await? {
        tracing::debug!("Users already exist, skipping admin creation");
        return Ok(None);
    }

    tracing::info!("First boot detected, creating admin user");

    let (username, password) = admin_credentials_from_env();
    let password_hash = hash_password(&password)?;

    match db::users::create(pool, &username, &password_hash).await {
        Ok(user) => {
            tracing::info!("Created admin user: username={}", user.username);
            Ok(Some(user.username))
        }
        Err(DalError::Conflict(_)) => {
            tracing::warn!("Admin user {} already exists, skipping creation", username);
            Ok(Some(username))
        }
        Err(e) => {
            tracing::error!("Failed to create admin user: {}", e);
            Err(e)
        }
    }
}
