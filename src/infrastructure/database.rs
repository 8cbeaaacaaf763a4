//! 数据库基础设施

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Error,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::config::DatabaseConfig;

/// 示例数据：(name, description, price, internal_cost, is_active)
const SEED_PRODUCTS: [(&str, &str, f64, f64, bool); 4] = [
    ("Vulnerable Widget", "A widget with many security flaws.", 9.99, 5.00, true),
    ("Insecure Gadget", "This gadget will expose your data.", 19.99, 10.00, true),
    ("Broken Device", "Designed to fail security audits.", 29.99, 15.00, false),
    ("Exploitable Tool", "Easy to hack, fun for pentesters.", 39.99, 20.00, true),
];

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        // 内存库每个连接都是独立的数据库，连接不能被回收
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 建表并写入示例数据
    pub async fn prepare(&self, reset: bool) -> Result<(), Error> {
        create_tables(&self.pool).await?;
        seed_data(&self.pool, reset).await
    }
}

async fn create_tables(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT    NOT NULL,
            description   TEXT    NOT NULL DEFAULT '',
            price         REAL    NOT NULL DEFAULT 0,
            internal_cost REAL    NOT NULL DEFAULT 0,
            is_active     INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_data(pool: &SqlitePool, reset: bool) -> Result<(), Error> {
    let mut tx = pool.begin().await?;

    if reset {
        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
    } else {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;
        if count.0 > 0 {
            info!("Database already contains products, skipping seed");
            return Ok(());
        }
    }

    for (name, description, price, internal_cost, is_active) in SEED_PRODUCTS {
        sqlx::query(
            "INSERT INTO products (name, description, price, internal_cost, is_active) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(internal_cost)
        .bind(is_active)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(count = SEED_PRODUCTS.len(), reset, "Products table seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            reset_on_start: true,
        }
    }

    async fn count(db: &DatabaseManager) -> i64 {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(db.get_pool())
            .await
            .unwrap();
        row.0
    }

    #[tokio::test]
    async fn test_reset_reseeds() {
        let db = DatabaseManager::new(&memory_config()).await.unwrap();
        db.prepare(true).await.unwrap();
        sqlx::query("INSERT INTO products (name) VALUES ('extra')")
            .execute(db.get_pool())
            .await
            .unwrap();
        assert_eq!(count(&db).await, 5);

        db.prepare(true).await.unwrap();
        assert_eq!(count(&db).await, 4);
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let db = DatabaseManager::new(&memory_config()).await.unwrap();
        db.prepare(false).await.unwrap();
        assert_eq!(count(&db).await, 4);

        db.prepare(false).await.unwrap();
        assert_eq!(count(&db).await, 4);
    }
}
