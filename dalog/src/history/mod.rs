//! 履歴クエリエンジン
//!
//! ユーザーIDと日付範囲の任意フィルタを検証済みの`HistoryFilter`に変換し、
//! 台帳から新しい順に取得する。日付の書式誤りは警告に格下げされ、その境界だけが無視される。

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;

use crate::common::error::{DalError, DalResult};
use crate::db::traits::{LedgerRepository, UserRepository};
use crate::view::{HistoryView, Notice, NoticeKind};

/// 全ユーザーを表すセンチネル値
pub const ALL_USERS: &str = "all";

/// 履歴画面のクエリパラメータ（未検証の文字列）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    /// ユーザーID または "all"
    pub user_id: Option<String>,
    /// 開始日（YYYY-MM-DD）
    pub start_date: Option<String>,
    /// 終了日（YYYY-MM-DD、その日の終わりまで含む）
    pub end_date: Option<String>,
}

/// 検証済みの履歴フィルタ
///
/// 各条件は独立した任意項目で、AND結合される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// 対象ユーザー
    pub user_id: Option<i64>,
    /// 下限（含む）
    pub start: Option<DateTime<Utc>>,
    /// 上限（含まない）
    pub end_exclusive: Option<DateTime<Utc>>,
}

impl HistoryFilter {
    /// クエリパラメータから構築
    ///
    /// 日付の書式誤りはエラーにせず警告として返す。ユーザーIDの書式誤りはエラー。
    ///
    /// # Returns
    /// * `Ok((HistoryFilter, Vec<Notice>))` - フィルタと警告
    /// * `Err(DalError::InvalidUserFilter)` - ユーザーIDが整数でも"all"でもない
    pub fn from_query(query: &HistoryQuery) -> DalResult<(Self, Vec<Notice>)> {
        let mut notices = Vec::new();

        let user_id = parse_user_filter(query.user_id.as_deref())?;

        let start = match present(query.start_date.as_deref()) {
            Some(raw) => match parse_date(raw) {
                Ok(date) => Some(start_of_day(date)),
                Err(e) => {
                    tracing::debug!("Ignoring start date filter: {}", e);
                    notices.push(Notice::from(NoticeKind::InvalidStartDate));
                    None
                }
            },
            None => None,
        };

        let end_exclusive = match present(query.end_date.as_deref()) {
            Some(raw) => match parse_date(raw) {
                Ok(date) => start_of_next_day(date),
                Err(e) => {
                    tracing::debug!("Ignoring end date filter: {}", e);
                    notices.push(Notice::from(NoticeKind::InvalidEndDate));
                    None
                }
            },
            None => None,
        };

        Ok((
            Self {
                user_id,
                start,
                end_exclusive,
            },
            notices,
        ))
    }

    /// エントリがフィルタ条件をすべて満たすか
    pub fn matches(&self, user_id: i64, access_time: &DateTime<Utc>) -> bool {
        self.user_id.is_none_or(|wanted| wanted == user_id)
            && self.start.is_none_or(|start| *access_time >= start)
            && self.end_exclusive.is_none_or(|end| *access_time < end)
    }
}

/// 空文字列は未指定として扱う（空白のみは値として扱う）
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// ユーザーフィルタを解析（未指定・空・"all"は絞り込みなし）
pub fn parse_user_filter(raw: Option<&str>) -> DalResult<Option<i64>> {
    match present(raw) {
        None => Ok(None),
        Some(ALL_USERS) => Ok(None),
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| DalError::InvalidUserFilter(value.to_string())),
    }
}

/// `YYYY-MM-DD`形式の日付を厳密に解析
///
/// 4桁の年・2桁の月・2桁の日のみ受け付ける。
pub fn parse_date(raw: &str) -> DalResult<NaiveDate> {
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(DalError::InvalidDateFormat(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| DalError::InvalidDateFormat(raw.to_string()))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// 翌日0時（UTC）。保存形式で表せない年（9999年より後）になる場合は上限なし。
fn start_of_next_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.succ_opt()
        .filter(|next| chrono::Datelike::year(next) <= 9999)
        .map(start_of_day)
}

/// 履歴を取得して画面用のビューモデルを組み立てる
///
/// # Arguments
/// * `repo` - 台帳とユーザーのRepository
/// * `query` - 未検証のクエリパラメータ
///
/// # Returns
/// * `Ok(HistoryView)` - 新しい順のエントリ、ユーザー一覧、警告
/// * `Err(DalError)` - ユーザーフィルタ不正、またはDBエラー
pub async fn query_history<R>(repo: &R, query: &HistoryQuery) -> DalResult<HistoryView>
where
    R: LedgerRepository + UserRepository + ?Sized,
{
    let (filter, notices) = HistoryFilter::from_query(query)?;
    let entries = repo.query_entries(&filter).await?;
    let users = repo
        .list_users()
        .await?
        .iter()
        .map(|u| u.summary())
        .collect();

    tracing::debug!(
        user_id = ?filter.user_id,
        start = ?filter.start,
        end_exclusive = ?filter.end_exclusive,
        count = entries.len(),
        "History queried"
    );

    Ok(HistoryView {
        entries,
        users,
        selected_user_id: query.user_id.clone(),
        selected_start_date: query.start_date.clone(),
        selected_end_date: query.end_date.clone(),
        notices,
    })
}
