//! Property-based tests using proptest

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use dalog::db;
use dalog::history::{parse_date, HistoryFilter, HistoryQuery};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn day_string(offset: i64) -> String {
    (base_time() + Duration::days(offset))
        .format("%Y-%m-%d")
        .to_string()
}

/// (user index, seconds since 2024-01-01)
fn entries_strategy() -> impl Strategy<Value = Vec<(usize, i64)>> {
    // 10日分の範囲に、同時刻が出やすいよう粗い粒度も混ぜる
    prop::collection::vec(
        (
            0usize..3,
            prop_oneof![0i64..10 * 86_400, (0i64..40).prop_map(|h| h * 6 * 3_600)],
        ),
        0..25,
    )
}

fn query_strategy() -> impl Strategy<Value = HistoryQuery> {
    (
        prop::option::of(prop_oneof![
            Just("all".to_string()),
            (1i64..5).prop_map(|id| id.to_string())
        ]),
        prop::option::of((-1i64..11).prop_map(day_string)),
        prop::option::of((-1i64..11).prop_map(day_string)),
    )
        .prop_map(|(user_id, start_date, end_date)| HistoryQuery {
            user_id,
            start_date,
            end_date,
        })
}

/// SQLで絞り込んだ結果と、全件にメモリ上で述語を適用した結果のID列
fn run_query(entries: &[(usize, i64)], query: &HistoryQuery) -> (Vec<i64>, Vec<i64>, bool) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    rt.block_on(async {
        let pool = sqlx::SqlitePool::connect("sqlite::memory:").await.unwrap();
        db::migrations::run_migrations(&pool).await.unwrap();

        let mut user_ids = Vec::new();
        for name in ["u1", "u2", "u3"] {
            user_ids.push(db::users::create(&pool, name, "h").await.unwrap().id);
        }
        let dataset = db::datasets::create(&pool, "d", None).await.unwrap();

        let mut all = Vec::new();
        for (user, secs) in entries {
            let at = base_time() + Duration::seconds(*secs);
            let entry = db::access_logs::append(&pool, user_ids[*user], dataset.id, at, "p")
                .await
                .unwrap();
            all.push(entry);
        }

        let (filter, _notices) = HistoryFilter::from_query(query).unwrap();
        let rows = db::access_logs::query(&pool, &filter).await.unwrap();
        let ordered = rows
            .windows(2)
            .all(|w| (w[0].access_time, w[0].id) > (w[1].access_time, w[1].id));
        let from_sql: Vec<i64> = rows.iter().map(|r| r.id).collect();

        let mut expected: Vec<_> = all
            .iter()
            .filter(|e| filter.matches(e.user_id, &e.access_time))
            .collect();
        expected.sort_by(|a, b| (b.access_time, b.id).cmp(&(a.access_time, a.id)));
        let from_memory: Vec<i64> = expected.iter().map(|e| e.id).collect();

        (from_sql, from_memory, ordered)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// SQLの絞り込み結果はメモリ上の述語と一致し、新しい順に並ぶ
    #[test]
    fn sql_filter_matches_predicate(entries in entries_strategy(), query in query_strategy()) {
        let (from_sql, from_memory, ordered) = run_query(&entries, &query);
        prop_assert_eq!(from_sql, from_memory);
        prop_assert!(ordered, "results were not newest first");
    }
}

proptest! {
    /// 有効な日付は書式化してから解析すると元に戻る
    #[test]
    fn valid_dates_roundtrip(days in 0i64..3_000_000) {
        let date = NaiveDate::from_ymd_opt(1000, 1, 1).unwrap() + Duration::days(days);
        let text = date.format("%Y-%m-%d").to_string();
        prop_assume!(text.len() == 10);
        prop_assert_eq!(parse_date(&text).unwrap(), date);
    }

    /// 10文字でない入力は必ず拒否される
    #[test]
    fn wrong_length_is_rejected(text in "\\PC{0,20}") {
        prop_assume!(text.len() != 10);
        prop_assert!(parse_date(&text).is_err());
    }

    /// 終了日フィルタは当日の最後の1秒を含み、翌日の最初の1秒を含まない
    #[test]
    fn end_date_is_inclusive_of_whole_day(offset in 0i64..3_000) {
        let day = base_time() + Duration::days(offset);
        let query = HistoryQuery {
            user_id: None,
            start_date: None,
            end_date: Some(day.format("%Y-%m-%d").to_string()),
        };
        let (filter, notices) = HistoryFilter::from_query(&query).unwrap();
        prop_assert!(notices.is_empty());

        let last_second = day + Duration::seconds(86_399);
        let next_day = day + Duration::seconds(86_401);
        prop_assert!(filter.matches(1, &last_second));
        prop_assert!(!filter.matches(1, &next_day));
    }

    /// 開始日フィルタは当日0時ちょうどを含む
    #[test]
    fn start_date_includes_midnight(offset in 0i64..3_000) {
        let day = base_time() + Duration::days(offset);
        let query = HistoryQuery {
            user_id: None,
            start_date: Some(day.format("%Y-%m-%d").to_string()),
            end_date: None,
        };
        let (filter, _notices) = HistoryFilter::from_query(&query).unwrap();
        prop_assert!(filter.matches(1, &day));
        prop_assert!(!filter.matches(1, &(day - Duration::seconds(1))));
    }
}
