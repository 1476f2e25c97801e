//! Applies the `*.sql` files of a directory to the database, each exactly
//! once, in lexicographic file name order.
//!
//! Applied file names are recorded in the `schema_migrations` ledger. A file
//! and its ledger row are committed in the same transaction, so a failing
//! file leaves neither behind.

use sqlx::{Executor, PgPool, Postgres, Transaction};
use std::path::{Path, PathBuf};

const MIGRATION_SUFFIX: &str = ".sql";

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Failed to prepare the migration ledger")]
    Ledger(#[source] sqlx::Error),
    #[error("Failed to read migrations directory `{}`", .0.display())]
    ReadDirectory(PathBuf, #[source] std::io::Error),
    #[error("Failed to read migration `{0}`")]
    ReadFile(String, #[source] std::io::Error),
    #[error("Failed to check whether migration `{0}` was applied")]
    Check(String, #[source] sqlx::Error),
    #[error("Failed to apply migration `{0}`")]
    Apply(String, #[source] sqlx::Error),
    #[error("Failed to record migration `{0}`")]
    Record(String, #[source] sqlx::Error),
}

#[derive(Debug)]
pub struct Migration {
    pub filename: String,
    path: PathBuf,
}

/// Runs every migration of `dir` that is not in the ledger yet and returns
/// the file names applied by this call. Stops at the first failure; files
/// committed before it stay applied.
#[tracing::instrument(name = "Running migrations", skip(db_pool))]
pub async fn run_migrations(db_pool: &PgPool, dir: &Path) -> Result<Vec<String>, MigrationError> {
    ensure_ledger(db_pool).await?;

    let mut applied = Vec::new();
    for migration in discover(dir).await? {
        if is_applied(db_pool, &migration.filename).await? {
            tracing::debug!(migration = %migration.filename, "Migration already applied");
            continue;
        }

        let sql = tokio::fs::read_to_string(&migration.path)
            .await
            .map_err(|e| MigrationError::ReadFile(migration.filename.clone(), e))?;

        apply(db_pool, &migration.filename, &sql).await?;
        tracing::info!(migration = %migration.filename, "Applied migration");
        applied.push(migration.filename);
    }

    Ok(applied)
}

/// Lists the migration files of `dir`, sorted by file name.
pub async fn discover(dir: &Path) -> Result<Vec<Migration>, MigrationError> {
    let read_error = |e: std::io::Error| MigrationError::ReadDirectory(dir.to_path_buf(), e);

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    let mut migrations = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        if entry.file_type().await.map_err(read_error)?.is_dir() {
            continue;
        }
        let Ok(filename) = entry.file_name().into_string() else {
            tracing::warn!(path = ?entry.path(), "Skipping migration with a non UTF-8 name");
            continue;
        };
        if filename.ends_with(MIGRATION_SUFFIX) {
            migrations.push(Migration {
                filename,
                path: entry.path(),
            });
        }
    }

    migrations.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(migrations)
}

/// File names recorded in the ledger, in application order.
pub async fn applied_migrations(db_pool: &PgPool) -> Result<Vec<String>, MigrationError> {
    sqlx::query_scalar(
        r#"
        SELECT filename FROM schema_migrations
        ORDER BY applied_at, filename
        "#,
    )
    .fetch_all(db_pool)
    .await
    .map_err(MigrationError::Ledger)
}

#[tracing::instrument(skip_all)]
async fn ensure_ledger(db_pool: &PgPool) -> Result<(), MigrationError> {
    db_pool
        .execute(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                filename TEXT PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .await
        .map_err(MigrationError::Ledger)?;

    Ok(())
}

async fn is_applied(db_pool: &PgPool, filename: &str) -> Result<bool, MigrationError> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE filename = $1)
        "#,
    )
    .bind(filename)
    .fetch_one(db_pool)
    .await
    .map_err(|e| MigrationError::Check(filename.to_owned(), e))
}

#[tracing::instrument(skip(db_pool, sql))]
async fn apply(db_pool: &PgPool, filename: &str, sql: &str) -> Result<(), MigrationError> {
    let mut transaction = db_pool
        .begin()
        .await
        .map_err(|e| MigrationError::Apply(filename.to_owned(), e))?;

    if let Err(e) = (&mut *transaction).execute(sql).await {
        rollback(transaction, filename).await;
        return Err(MigrationError::Apply(filename.to_owned(), e));
    }

    let recorded = sqlx::query(
        r#"
        INSERT INTO schema_migrations (filename)
        VALUES ($1)
        "#,
    )
    .bind(filename)
    .execute(&mut *transaction)
    .await;
    if let Err(e) = recorded {
        rollback(transaction, filename).await;
        return Err(MigrationError::Record(filename.to_owned(), e));
    }

    transaction
        .commit()
        .await
        .map_err(|e| MigrationError::Record(filename.to_owned(), e))
}

async fn rollback(transaction: Transaction<'_, Postgres>, filename: &str) {
    if let Err(e) = transaction.rollback().await {
        tracing::warn!(
            error.cause_chain = ?e,
            migration = filename,
            "Failed to roll back migration transaction"
        );
    }
}
