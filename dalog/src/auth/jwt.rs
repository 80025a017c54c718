// JWT生成と検証（jsonwebtoken実装）

use crate::common::auth::Claims;
use crate::common::error::DalError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// セッションJWTを生成
///
/// # Arguments
/// * `user_id` - ユーザーID
/// * `session_id` - サーバー側セッションID
/// * `expires_at` - 有効期限（セッションと同一）
/// * `secret` - JWTシークレットキー
///
/// # Returns
/// * `Ok(String)` - JWTトークン
/// * `Err(DalError)` - 生成失敗
pub fn create_jwt(
    user_id: i64,
    session_id: Uuid,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> Result<String, DalError> {
    let exp = usize::try_from(expires_at.timestamp())
        .map_err(|_| DalError::Jwt("Expiration time is before the epoch".to_string()))?;

    let claims = Claims {
        sub: user_id.to_string(),
        sid: session_id.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DalError::Jwt(format!("Failed to create JWT: {}", e)))
}

/// JWTトークンを検証
///
/// # Returns
/// * `Ok(Claims)` - 検証済みクレーム
/// * `Err(DalError)` - 検証失敗（無効なトークン、期限切れなど）
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, DalError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| DalError::Jwt(format!("Failed to verify JWT: {}", e)))
}
