// パスワードハッシュ化と検証（bcrypt実装）

use crate::common::error::DalError;
use bcrypt::{hash, verify};

/// パスワードハッシュ化のコスト（12推奨、200-300ms）
const HASH_COST: u32 = 12;

/// パスワードをbcryptでハッシュ化
///
/// # Arguments
/// * `password` - ハッシュ化するパスワード
///
/// # Returns
/// * `Ok(String)` - bcryptハッシュ文字列（$2b$で始まる）
/// * `Err(DalError)` - ハッシュ化失敗
pub fn hash_password(password: &str) -> Result<String, DalError> {
    hash(password, HASH_COST)
        .map_err(|e| DalError::PasswordHash(format!("Failed to hash password: {}", e)))
}

/// パスワードを検証
///
/// # Returns
/// * `Ok(true)` - パスワード一致
/// * `Ok(false)` - パスワード不一致
/// * `Err(DalError)` - 検証失敗（ハッシュ形式不正など）
pub fn verify_password(password: &str, hash: &str) -> Result<bool, DalError> {
    verify(password, hash)
        .map_err(|e| DalError::PasswordHash(format!("Failed to verify password: {}", e)))
}
