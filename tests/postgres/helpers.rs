//! Shared helpers for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use super::cluster::TemporaryDatabase;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use luach::auth::adapters::postgres::PostgresOtpRepository;
use luach::board::adapters::postgres::PostgresBoardRepository;
use rstest::fixture;
use uuid::Uuid;

/// SQL creating the board document tables and the one-time-code table.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-06-01-000000_create_luach_tables/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "luach_test_template";

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub async fn ensure_template(cluster: PostgresCluster) -> Result<(), BoxError> {
    let connection = cluster.connection();
    cluster
        .ensure_template_exists(TEMPLATE_DB, move |db_name| {
            apply_migrations(&connection.database_url(db_name))
        })
        .await
}

fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.batch_execute(CREATE_SCHEMA_SQL)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok(())
}

async fn temporary_pool(
    cluster: PostgresCluster,
    prefix: &str,
) -> Result<(TemporaryDatabase, Pool<ConnectionManager<PgConnection>>), BoxError> {
    let db_name = format!("{prefix}_{}", Uuid::new_v4().simple());
    let temp_db = cluster
        .temporary_database_from_template(&db_name, TEMPLATE_DB)
        .await?;

    let manager = ConnectionManager::<PgConnection>::new(temp_db.url());
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|err| Box::new(err) as BoxError)?;
    Ok((temp_db, pool))
}

/// Board repository bound to its own temporary database.
pub struct BoardPgContext {
    /// Repository under test.
    pub repository: PostgresBoardRepository,
    _temp_db: TemporaryDatabase,
}

/// Provides a board repository over a freshly created database.
#[fixture]
pub async fn board_context(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> Result<BoardPgContext, BoxError> {
    let cluster = postgres_cluster?;
    ensure_template(cluster).await?;
    let (temp_db, pool) = temporary_pool(cluster, "board").await?;
    Ok(BoardPgContext {
        repository: PostgresBoardRepository::new(pool),
        _temp_db: temp_db,
    })
}

/// One-time-code repository bound to its own temporary database.
pub struct OtpPgContext {
    /// Repository under test.
    pub repository: PostgresOtpRepository,
    _temp_db: TemporaryDatabase,
}

/// Provides a one-time-code repository over a freshly created database.
#[fixture]
pub async fn otp_context(
    postgres_cluster: Result<PostgresCluster, BoxError>,
) -> Result<OtpPgContext, BoxError> {
    let cluster = postgres_cluster?;
    ensure_template(cluster).await?;
    let (temp_db, pool) = temporary_pool(cluster, "otp").await?;
    Ok(OtpPgContext {
        repository: PostgresOtpRepository::new(pool),
        _temp_db: temp_db,
    })
}
