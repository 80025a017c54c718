//! 初期データ投入と台帳の追記専用性

use chrono::Utc;
use dalog::db::{self, migrations};
use dalog::seed::{self, SeedReport};
use dalog::{auth, bootstrap};
use serial_test::serial;

fn clear_admin_env() {
    for key in [
        "DALOG_ADMIN_USERNAME",
        "DALOG_ADMIN_PASSWORD",
        "ADMIN_USERNAME",
        "ADMIN_PASSWORD",
    ] {
        std::env::remove_var(key);
    }
}

#[tokio::test]
#[serial]
async fn seeding_is_idempotent_across_restarts() {
    clear_admin_env();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("dalog.db").display());

    let first = bootstrap::seed_only(&url).await.unwrap();
    assert_eq!(first.admin_created.as_deref(), Some("admin"));
    assert_eq!(first.datasets_created, 4);

    for _ in 0..2 {
        let again = bootstrap::seed_only(&url).await.unwrap();
        assert_eq!(again, SeedReport::default());
    }

    let pool = migrations::initialize_database(&url).await.unwrap();
    assert_eq!(db::users::count(&pool).await.unwrap(), 1);
    assert_eq!(db::datasets::count(&pool).await.unwrap(), 4);

    let admin = db::users::find_by_username(&pool, "admin")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(admin.password_hash, "adminpass");
    assert!(auth::password::verify_password("adminpass", &admin.password_hash).unwrap());
}

#[tokio::test]
#[serial]
async fn admin_credentials_come_from_env() {
    clear_admin_env();
    std::env::set_var("DALOG_ADMIN_USERNAME", "auditor");
    std::env::set_var("DALOG_ADMIN_PASSWORD", "correct horse");
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("dalog.db").display());

    let report = bootstrap::seed_only(&url).await.unwrap();
    assert_eq!(report.admin_created.as_deref(), Some("auditor"));

    let pool = migrations::initialize_database(&url).await.unwrap();
    let user = db::users::find_by_username(&pool, "auditor")
        .await
        .unwrap()
        .unwrap();
    assert!(auth::password::verify_password("correct horse", &user.password_hash).unwrap());
    clear_admin_env();
}

#[tokio::test]
#[serial]
async fn ledger_rejects_mutation_on_file_database() {
    clear_admin_env();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("dalog.db").display());
    let pool = migrations::initialize_database(&url).await.unwrap();
    seed::seed_defaults(&pool).await.unwrap();

    let admin = db::users::find_by_username(&pool, "admin")
        .await
        .unwrap()
        .unwrap();
    let entry = db::access_logs::append(&pool, admin.id, 1, Utc::now(), "original")
        .await
        .unwrap();

    assert!(sqlx::query("UPDATE access_logs SET purpose = 'edited'")
        .execute(&pool)
        .await
        .is_err());
    assert!(sqlx::query("DELETE FROM access_logs")
        .execute(&pool)
        .await
        .is_err());

    let purpose: String = sqlx::query_scalar("SELECT purpose FROM access_logs WHERE id = ?")
        .bind(entry.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(purpose, "original");
}
