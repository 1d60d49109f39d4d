use crate::error::{map_migrate_error, map_sqlx_error};
use async_trait::async_trait;
use clipper_core::repository::Result;
use clipper_core::{
    BatchEntry, BatchItem, PutOutcome, Repository, Slug, Stats, StorageError, UrlRecord,
};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Connection, Row};
use std::num::NonZeroUsize;
use tracing::{debug, info};

/// Pool size is this many connections per available CPU.
pub const CPU_MULTIPLIER: usize = 4;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const UPSERT: &str = r#"
    INSERT INTO shortener (slug, original_url, user_id)
    VALUES ($1, $2, $3)
    ON CONFLICT (original_url)
    DO UPDATE SET original_url = EXCLUDED.original_url
    RETURNING slug
"#;

/// PostgreSQL implementation of the repository contract.
///
/// `original_url` is unique: storing a URL that already exists returns the
/// slug it was first stored under as [`PutOutcome::Conflict`]. Deletion is
/// soft (`deleted_flag`); deleted rows are still returned by
/// [`Repository::get`] so callers can tell "deleted" from "never existed".
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing pool. Migrations are not run.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool sized to the host's parallelism and applies pending migrations.
    ///
    /// Fails if the database is unreachable or a migration cannot be applied.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let max_connections = pool_size();
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(dsn)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let repository = Self::new(pool);
        repository.migrate().await?;
        info!(max_connections, "connected to postgres");
        Ok(repository)
    }

    /// Applies pending migrations. Already applied versions are skipped.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.map_err(map_migrate_error)?;
        debug!("postgres schema is up to date");
        Ok(())
    }
}

fn pool_size() -> u32 {
    let cpus = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    u32::try_from(cpus * CPU_MULTIPLIER).unwrap_or(u32::MAX)
}

fn record_from_row(row: &PgRow) -> Result<UrlRecord> {
    let slug: String = row.try_get("slug").map_err(|e| map_sqlx_error("read slug", e))?;
    let original_url: String = row
        .try_get("original_url")
        .map_err(|e| map_sqlx_error("read original_url", e))?;
    let owner: String = row
        .try_get("user_id")
        .map_err(|e| map_sqlx_error("read user_id", e))?;
    let deleted: bool = row
        .try_get("deleted_flag")
        .map_err(|e| map_sqlx_error("read deleted_flag", e))?;

    Ok(UrlRecord {
        slug: Slug::new_unchecked(slug),
        original_url,
        owner,
        deleted,
    })
}

fn count(row: &PgRow, column: &str) -> Result<u64> {
    let value: i64 = row
        .try_get(column)
        .map_err(|e| map_sqlx_error("read stats", e))?;
    u64::try_from(value)
        .map_err(|_| StorageError::InvalidData(format!("negative {column} count: {value}")))
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get(&self, slug: &Slug) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT slug, original_url, user_id, deleted_flag
            FROM shortener
            WHERE slug = $1
            "#,
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get url", e))?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn put(&self, slug: &Slug, original_url: &str, owner: &str) -> Result<PutOutcome> {
        let stored: String = sqlx::query_scalar(UPSERT)
            .bind(slug.as_str())
            .bind(original_url)
            .bind(owner)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("put url", e))?;

        if stored == slug.as_str() {
            Ok(PutOutcome::Created(slug.clone()))
        } else {
            debug!(proposed = %slug, existing = %stored, "url already shortened");
            Ok(PutOutcome::Conflict(Slug::new_unchecked(stored)))
        }
    }

    /// Runs every upsert inside one transaction: the batch is applied
    /// completely or not at all.
    async fn put_batch(&self, items: &[BatchItem], owner: &str) -> Result<Vec<BatchEntry>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin batch", e))?;

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let stored: String = sqlx::query_scalar(UPSERT)
                .bind(item.slug.as_str())
                .bind(&item.original_url)
                .bind(owner)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    map_sqlx_error(&format!("put batch item {}", item.correlation_id), e)
                })?;
            entries.push(BatchEntry {
                correlation_id: item.correlation_id.clone(),
                slug: Slug::new_unchecked(stored),
            });
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit batch", e))?;
        Ok(entries)
    }

    async fn get_all_by_owner(&self, owner: &str) -> Result<Vec<UrlRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT slug, original_url, user_id, deleted_flag
            FROM shortener
            WHERE user_id = $1 AND deleted_flag = FALSE
            ORDER BY slug
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list user urls", e))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn delete_many(&self, slugs: &[Slug], owner: &str) -> Result<()> {
        let slugs: Vec<&str> = slugs.iter().map(Slug::as_str).collect();

        let result = sqlx::query(
            r#"
            UPDATE shortener
            SET deleted_flag = TRUE
            WHERE slug = ANY($1) AND user_id = $2
            "#,
        )
        .bind(slugs.as_slice())
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete user urls", e))?;

        debug!(
            requested = slugs.len(),
            deleted = result.rows_affected(),
            owner = %owner,
            "soft-deleted urls"
        );
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("acquire connection", e))?;
        conn.ping().await.map_err(|e| map_sqlx_error("ping", e))
    }

    async fn stats(&self) -> Result<Stats> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS urls,
                   COUNT(DISTINCT NULLIF(user_id, '')) AS users
            FROM shortener
            WHERE deleted_flag = FALSE
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("stats", e))?;

        Ok(Stats {
            urls: count(&row, "urls")?,
            users: count(&row, "users")?,
        })
    }

    async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("closed postgres pool");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_scales_with_cpus() {
        let size = pool_size();
        assert!(size >= CPU_MULTIPLIER as u32);
        assert_eq!(size as usize % CPU_MULTIPLIER, 0);
    }

    #[test]
    fn migrations_are_versioned_in_order() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert_eq!(versions.len(), 2);
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
