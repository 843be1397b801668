use crate::error::DbError;
use configuration::{DatabaseSettings, PoolSettings};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Connection, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// How long a caller waits for a free pooled connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the PostgreSQL connection options from discrete settings.
///
/// Options are assembled field by field rather than by formatting a URL, so
/// passwords containing `@`, `/` or spaces need no escaping.
pub fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    let ssl_mode = PgSslMode::from_str(&settings.sslmode).map_err(|e| {
        DbError::ConnectionConfigError(format!("invalid sslmode '{}': {e}", settings.sslmode))
    })?;

    Ok(PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.dbname)
        .ssl_mode(ssl_mode))
}

/// Applies the pool bounds: at most `max_connections` open, `idle_connections`
/// kept warm, anything beyond that closed after `idle_timeout`.
pub fn pool_options(pool: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .min_connections(pool.idle_connections)
        .idle_timeout(pool.idle_timeout())
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is pinged before it is returned, so bad credentials or an
/// unreachable host fail here instead of on the first request.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = connect_options(settings)?;

    let pool = pool_options(&settings.pool)
        .connect_with(options)
        .await
        .map_err(DbError::Unreachable)?;

    let mut conn = pool.acquire().await.map_err(DbError::Unreachable)?;
    conn.ping().await.map_err(DbError::Unreachable)?;

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        dbname = %settings.dbname,
        max_connections = settings.pool.max_connections,
        "Connected to the database."
    );
    Ok(pool)
}

/// A utility function to run database migrations automatically.
///
/// This is useful for ensuring the database schema is up-to-date when the application starts,
/// which is especially important in production deployments.
///
/// A pre-existing `mahasiswa` table that still lacks the unique NIM index is
/// checked for duplicate NIMs first; creating the index would fail on them,
/// so they are reported by value instead.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    let duplicates = duplicate_nims_blocking_index(pool).await?;
    if !duplicates.is_empty() {
        return Err(DbError::DuplicateNimsInTable(duplicates));
    }

    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}

/// NIMs held by more than one row, if the unique index is not there yet.
async fn duplicate_nims_blocking_index(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let needs_check = sqlx::query_scalar::<_, bool>(
        "SELECT to_regclass('mahasiswa') IS NOT NULL AND to_regclass('mahasiswa_nim_key') IS NULL",
    )
    .fetch_one(pool)
    .await?;
    if !needs_check {
        return Ok(Vec::new());
    }

    let nims = sqlx::query_scalar::<_, String>(
        "SELECT nim FROM mahasiswa GROUP BY nim HAVING COUNT(*) > 1 ORDER BY nim",
    )
    .fetch_all(pool)
    .await?;
    Ok(nims)
}
