//! 初期データ投入
//!
//! 管理者ユーザーとサンプルデータセットを作成する。何度実行しても結果は変わらない。

use serde::Serialize;
use sqlx::SqlitePool;

use crate::auth::bootstrap::ensure_admin_exists;
use crate::common::error::DalResult;
use crate::db;

/// サンプルデータセット（名前, 説明）
pub const SAMPLE_DATASETS: [(&str, &str); 4] = [
    (
        "Customer_Database",
        "Contains customer personal and order information.",
    ),
    ("Sales_Figures_Q1_2024", "Quarterly sales data for Q1 2024."),
    (
        "Marketing_Campaign_Results",
        "Performance metrics for recent marketing campaigns.",
    ),
    (
        "Product_Inventory",
        "Current stock levels and product details.",
    ),
];

/// 投入結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// 作成された管理者ユーザー名
    pub admin_created: Option<String>,
    /// 作成されたデータセット数
    pub datasets_created: usize,
}

/// データセットが1件もなければサンプルを登録する
///
/// 全件を1トランザクションで登録する。失敗時は何も残らないため、次回起動時に再試行される。
///
/// # Returns
/// * `Ok(usize)` - 登録した件数（既にデータセットがあれば0）
/// * `Err(DalError)` - 登録失敗
pub async fn ensure_sample_datasets(pool: &SqlitePool) -> DalResult<usize> {
    let created = db::datasets::create_all_if_empty(pool, &SAMPLE_DATASETS).await?;
    if created == 0 {
        tracing::debug!("Datasets already exist, skipping sample datasets");
    } else {
        tracing::info!("Created {} sample datasets", created);
    }
    Ok(created)
}

/// 管理者とサンプルデータセットを投入する
pub async fn seed_defaults(pool: &SqlitePool) -> DalResult<SeedReport> {
    let admin_created = ensure_admin_exists(pool).await?;
    let datasets_created = ensure_sample_datasets(pool).await?;
    Ok(SeedReport {
        admin_created,
        datasets_created,
    })
}
