use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, LiveStore, seed_records};
use products_hr::{Authenticator, HrModule, MockStore, RecordStore, store::demo_employee};
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};
use portal_tests::{POSTGRES_PORT, postgres_image, postgres_url};
use testcontainers::clients::Cli;

#[tokio::test]
#[ignore = "needs a docker daemon"]
async fn live_store_serves_seeded_records() -> Result<()> {
    let docker = Cli::default();
    let container = docker.run(postgres_image());
    let port = container.get_host_port_ipv4(POSTGRES_PORT);
    let pool = Database::connect(&postgres_url(port)).await?;

    Migrator::up(&pool, None).await?;
    let fixtures = MockStore::default();
    assert_eq!(seed_records(&pool, &fixtures).await?, 1);
    // Seeding replaces rows instead of duplicating them.
    seed_records(&pool, &fixtures).await?;

    let store = LiveStore::new(pool);
    assert_eq!(count(store.pool(), "pay_stubs").await?, 2);
    store.ping().await?;

    let record = store
        .fetch_employee(123)
        .await?
        .context("seeded employee missing")?;
    assert_eq!(record, demo_employee());
    assert!(store.fetch_employee(124).await?.is_none());

    let stubs = store.fetch_pay_stubs(record.internal_id).await?;
    let checks = stubs.iter().map(|stub| stub.check_number).collect::<Vec<_>>();
    assert_eq!(checks, vec![1_033_678, 1_033_500]);
    assert!(store.fetch_pay_stubs(1).await?.is_empty());

    let auth = Authenticator::new(store.clone());
    assert!(auth.authenticate(123, "6789").await?);
    assert!(auth.authenticate(123, "123-45-6789").await?);
    assert!(!auth.authenticate(123, "0000").await?);
    assert!(!auth.authenticate(124, "6789").await?);

    let hr = HrModule::new(store);
    let list = hr.pay_stubs(record.internal_id, Some("3500")).await?;
    assert_eq!(list.count, 1);
    Ok(())
}

#[tokio::test]
#[ignore = "needs a docker daemon"]
async fn migrations_roll_back_cleanly() -> Result<()> {
    let docker = Cli::default();
    let container = docker.run(postgres_image());
    let port = container.get_host_port_ipv4(POSTGRES_PORT);
    let pool = Database::connect(&postgres_url(port)).await?;

    Migrator::up(&pool, None).await?;
    assert!(Migrator::get_pending_migrations(&pool).await?.is_empty());
    Migrator::down(&pool, None).await?;
    assert_eq!(Migrator::get_pending_migrations(&pool).await?.len(), 2);
    Ok(())
}

async fn count(pool: &DbPool, table: &str) -> Result<i64> {
    let row = pool
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            format!("SELECT count(*) AS count FROM {table}"),
        ))
        .await?
        .context("missing count row")?;
    Ok(row.try_get("", "count")?)
}
