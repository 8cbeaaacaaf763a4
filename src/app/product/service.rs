//! 产品业务服务

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::model::{NewProduct, Product, ProductChanges, ProductSummary};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct ProductService {
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 列出上架产品
    pub async fn list_active(&self) -> Result<Vec<ProductSummary>, CoreError> {
        let products = sqlx::query_as::<_, ProductSummary>(
            "SELECT id, name, description, price FROM products WHERE is_active = 1 ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn get_product(&self, id: i64) -> Result<Option<Product>, CoreError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, internal_cost, is_active FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// 在名称和描述中做不区分大小写的子串匹配
    pub async fn search(&self, term: &str) -> Result<Vec<ProductSummary>, CoreError> {
        let pattern = format!("%{}%", escape_like(term));
        debug!(term_len = term.len(), "searching products");

        let products = sqlx::query_as::<_, ProductSummary>(
            r#"
            SELECT id, name, description, price FROM products
            WHERE is_active = 1
              AND (name LIKE ?1 ESCAPE '\' OR description LIKE ?1 ESCAPE '\')
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn create_product(&self, product: NewProduct) -> Result<i64, CoreError> {
        let result = sqlx::query(
            "INSERT INTO products (name, description, price, internal_cost, is_active) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.internal_cost)
        .bind(product.is_active)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(id, "Created product");
        Ok(id)
    }

    /// 返回是否有行被修改
    pub async fn update_product(&self, id: i64, changes: ProductChanges) -> Result<bool, CoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                price = COALESCE(?, price),
                internal_cost = COALESCE(?, internal_cost),
                is_active = COALESCE(?, is_active)
            WHERE id = ?
            "#,
        )
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.internal_cost)
        .bind(changes.is_active)
        .bind(id)
        .execute(&self.pool)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!(id, "Updated product");
        }
        Ok(updated)
    }

    /// 返回是否有行被删除
    pub async fn delete_product(&self, id: i64) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(id, "Deleted product");
        }
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<i64, CoreError> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.0)
    }
}

/// 转义 LIKE 通配符，配合 `ESCAPE '\'` 使用
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("widget"), "widget");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("%' OR 1=1--"), "\\%' OR 1=1--");
    }
}
