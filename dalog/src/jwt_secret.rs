//! JWT秘密鍵管理
//!
//! 優先順位:
//! 1. 環境変数 `DALOG_JWT_SECRET`（旧: `SECRET_KEY`）
//! 2. データディレクトリの `jwt_secret` ファイル
//! 3. 新規生成してファイルに保存

use std::path::Path;

use crate::common::error::DalError;
use crate::config::get_env_with_fallback;

/// 秘密鍵ファイル名
pub const JWT_SECRET_FILE: &str = "jwt_secret";

/// 生成する秘密鍵の長さ
const GENERATED_SECRET_LEN: usize = 64;

/// JWT秘密鍵を取得（なければ生成して保存）
///
/// # Arguments
/// * `data_dir` - 秘密鍵ファイルを置くディレクトリ
///
/// # Returns
/// * `Ok(String)` - 秘密鍵
/// * `Err(DalError)` - ファイル読み書き失敗
pub fn get_or_create_jwt_secret(data_dir: &Path) -> Result<String, DalError> {
    if let Some(secret) = get_env_with_fallback("DALOG_JWT_SECRET", "SECRET_KEY") {
        if !secret.trim().is_empty() {
            return Ok(secret);
        }
        tracing::warn!("DALOG_JWT_SECRET is empty, falling back to the secret file");
    }

    let path = data_dir.join(JWT_SECRET_FILE);
    if path.exists() {
        let secret = std::fs::read_to_string(&path)
            .map_err(|e| DalError::Internal(format!("Failed to read JWT secret file: {}", e)))?;
        let secret = secret.trim().to_string();
        if !secret.is_empty() {
            tracing::debug!("Loaded JWT secret from {}", path.display());
            return Ok(secret);
        }
        tracing::warn!("JWT secret file {} is empty, regenerating", path.display());
    }

    std::fs::create_dir_all(data_dir)
        .map_err(|e| DalError::Internal(format!("Failed to create data directory: {}", e)))?;

    let secret = crate::auth::generate_random_token(GENERATED_SECRET_LEN);
    std::fs::write(&path, &secret)
        .map_err(|e| DalError::Internal(format!("Failed to write JWT secret file: {}", e)))?;
    restrict_permissions(&path);

    tracing::info!("Generated new JWT secret at {}", path.display());
    Ok(secret)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to restrict permissions on {}: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
