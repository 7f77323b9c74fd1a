use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::AppResult;
use crate::models::{Product, ProductRow};
use crate::pricing::PriceStore;

/// Accessor for the `Products` table. Cheap to clone, the pool is shared.
///
/// Concurrent requests touching the same barcode are not serialized: the
/// last write wins.
#[derive(Debug, Clone)]
pub struct ProductStore {
    pool: SqlitePool,
}

impl ProductStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Every product carrying a standard price. NULL special prices come back as zero.
    ///
    /// Prices are cast to REAL since NUMERIC or untyped columns keep whole
    /// numbers as INTEGER.
    pub async fn list_priced_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT COALESCE(SKU, '')   AS sku,
                   COALESCE(Barcode, '') AS barcode,
                   COALESCE(Name, '')  AS name,
                   CAST(StandardPrice AS REAL) AS standard_price,
                   CAST(SpecialPrice AS REAL)  AS special_price
            FROM Products
            WHERE StandardPrice IS NOT NULL AND StandardPrice != ''
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn count_matching(
        &self,
        barcode: &str,
        standard_price: f64,
        special_price: f64,
    ) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM Products
             WHERE StandardPrice = ? AND SpecialPrice = ? AND Barcode = ?",
        )
        .bind(standard_price)
        .bind(special_price)
        .bind(barcode)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }

    /// Only the two price columns are written; SKU and Name are left as stored.
    pub async fn update_product(
        &self,
        barcode: &str,
        standard_price: f64,
        special_price: f64,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE Products SET StandardPrice = ?, SpecialPrice = ? WHERE Barcode = ?",
        )
        .bind(standard_price)
        .bind(special_price)
        .bind(barcode)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Creates the `Products` table on an empty database. Existing tables are left alone.
    pub async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS Products (
                SKU           TEXT,
                Barcode       TEXT,
                Name          TEXT,
                StandardPrice REAL,
                SpecialPrice  REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl PriceStore for ProductStore {
    async fn count_matching(
        &self,
        barcode: &str,
        standard_price: f64,
        special_price: f64,
    ) -> AppResult<i64> {
        ProductStore::count_matching(self, barcode, standard_price, special_price).await
    }

    async fn update_product(
        &self,
        barcode: &str,
        standard_price: f64,
        special_price: f64,
    ) -> AppResult<u64> {
        ProductStore::update_product(self, barcode, standard_price, special_price).await
    }
}
