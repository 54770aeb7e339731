//! SQLite-backed configuration store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::debug;

use crate::models::AccountConfig;

use super::{ConfigStore, StoreResult};

/// Database connection pool holding account configurations.
pub struct Database {
    pool: SqlitePool,
}

/// Stored account configuration row.
#[derive(Debug, Clone, sqlx::FromRow)]
struct StoredAccountConfig {
    total_capital: f64,
    risk_per_trade_percentage: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoredAccountConfig> for AccountConfig {
    fn from(row: StoredAccountConfig) -> Self {
        Self {
            total_capital: row.total_capital,
            risk_per_trade_percentage: row.risk_per_trade_percentage,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Database {
    /// Create a new database connection.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Every connection to an in-memory database is a separate database
        let in_memory = database_url.contains(":memory:");
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = options
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run all database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account_config (
                account TEXT PRIMARY KEY,
                total_capital REAL NOT NULL,
                risk_per_trade_percentage REAL NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create account_config table")?;

        Ok(())
    }
}

#[async_trait]
impl ConfigStore for Database {
    async fn get(&self, account: &str) -> StoreResult<Option<AccountConfig>> {
        let row = sqlx::query_as::<_, StoredAccountConfig>(
            r#"
            SELECT total_capital, risk_per_trade_percentage, created_at, updated_at
            FROM account_config
            WHERE account = ?
            "#,
        )
        .bind(account)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AccountConfig::from))
    }

    async fn set(&self, account: &str, config: &AccountConfig) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO account_config
                (account, total_capital, risk_per_trade_percentage, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(account) DO UPDATE SET
                total_capital = excluded.total_capital,
                risk_per_trade_percentage = excluded.risk_per_trade_percentage,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(account)
        .bind(config.total_capital)
        .bind(config.risk_per_trade_percentage)
        .bind(config.created_at)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(account = %account, "Account configuration written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_roundtrip() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        assert!(db.get("default").await.unwrap().is_none());

        let config = AccountConfig::new(10_000.0, 2.0);
        db.set("default", &config).await.unwrap();

        let stored = db.get("default").await.unwrap().unwrap();
        assert_eq!(stored.total_capital, 10_000.0);
        assert_eq!(stored.risk_per_trade_percentage, 2.0);
        assert_eq!(stored.max_risk_per_trade(), 200.0);
    }

    #[tokio::test]
    async fn test_upsert_keeps_created_at() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let first = AccountConfig::new(10_000.0, 2.0);
        db.set("default", &first).await.unwrap();

        let second = AccountConfig::new(20_000.0, 1.0);
        db.set("default", &second).await.unwrap();

        let stored = db.get("default").await.unwrap().unwrap();
        assert_eq!(stored.total_capital, 20_000.0);
        assert_eq!(stored.created_at, first.created_at);
        assert_eq!(stored.updated_at, second.updated_at);
    }

    #[tokio::test]
    async fn test_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("config.db").display());

        {
            let db = Database::new(&url).await.unwrap();
            db.set("desk", &AccountConfig::new(5_000.0, 1.5)).await.unwrap();
        }

        let db = Database::new(&url).await.unwrap();
        let stored = db.get("desk").await.unwrap().unwrap();
        assert_eq!(stored.total_capital, 5_000.0);
        assert!(db.get("default").await.unwrap().is_none());
    }
}
