//! アクセスログ台帳
//!
//! 認証済みユーザーのデータセット参照を1件ずつ追記する。更新・削除の操作は提供しない。

use chrono::Utc;
use serde::Deserialize;

use crate::common::auth::SessionIdentity;
use crate::common::error::{DalError, DalResult};
use crate::common::types::AccessLogEntry;
use crate::db::traits::{DatasetRepository, LedgerRepository};

/// フォームの値（数値・文字列のどちらでも受け付ける）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    /// 数値
    Int(i64),
    /// 文字列
    Text(String),
}

/// アクセス記録フォーム（未検証）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordAccessForm {
    /// データセットID
    pub dataset: Option<FormValue>,
    /// アクセス目的
    pub purpose: Option<String>,
}

/// 検証済みのアクセス記録入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordAccessInput {
    /// データセットID
    pub dataset_id: i64,
    /// アクセス目的（未トリム）
    pub purpose: String,
}

impl RecordAccessInput {
    /// フォームを検証して入力に変換
    ///
    /// # Returns
    /// * `Ok(RecordAccessInput)` - 検証済み入力
    /// * `Err(DalError::MissingInput)` - データセットまたは目的が未入力
    /// * `Err(DalError::DatasetNotFound)` - データセットIDが整数でない
    pub fn parse(form: RecordAccessForm) -> DalResult<Self> {
        let dataset_id = match form.dataset {
            None => return Err(DalError::MissingInput("dataset")),
            Some(FormValue::Int(id)) => id,
            Some(FormValue::Text(raw)) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Err(DalError::MissingInput("dataset"));
                }
                raw.parse::<i64>()
                    .map_err(|_| DalError::DatasetNotFound(raw.to_string()))?
            }
        };

        let purpose = match form.purpose {
            Some(p) if !p.is_empty() => p,
            _ => return Err(DalError::MissingInput("purpose")),
        };

        Ok(Self {
            dataset_id,
            purpose,
        })
    }
}

/// アクセスを記録する
///
/// ユーザーは常にセッションの呼び出し元になる。時刻は記録時点のUTC。
///
/// # Arguments
/// * `repo` - データセットと台帳のRepository
/// * `identity` - 認証済みの呼び出し元
/// * `input` - 検証済み入力
///
/// # Returns
/// * `Ok(AccessLogEntry)` - 追記されたエントリ
/// * `Err(DalError::DatasetNotFound)` - データセットが存在しない
/// * `Err(DalError::MissingPurpose)` - 目的が空白のみ
/// * `Err(DalError::Persistence)` - 書き込み失敗（何も記録されていない）
pub async fn record_access<R>(
    repo: &R,
    identity: &SessionIdentity,
    input: RecordAccessInput,
) -> DalResult<AccessLogEntry>
where
    R: DatasetRepository + LedgerRepository + ?Sized,
{
    let dataset = repo
        .find_dataset(input.dataset_id)
        .await?
        .ok_or_else(|| DalError::DatasetNotFound(input.dataset_id.to_string()))?;

    let purpose = input.purpose.trim();
    if purpose.is_empty() {
        return Err(DalError::MissingPurpose);
    }

    let entry = repo
        .append_entry(identity.user_id, dataset.id, Utc::now(), purpose)
        .await
        .inspect_err(|e| {
            tracing::error!(
                user_id = identity.user_id,
                dataset_id = dataset.id,
                "Failed to record access: {}",
                e
            );
        })?;

    tracing::info!(
        entry_id = entry.id,
        user_id = entry.user_id,
        dataset = %dataset.name,
        "Access recorded"
    );

    Ok(entry)
}
