use std::io::Read;

use serde::Deserialize;
use tracing::info;

use crate::db::ProductStore;
use crate::error::{AppError, AppResult};

/// One line of a catalog CSV: `sku,barcode,name,standardprice,specialprice`.
/// Empty price cells are stored as NULL.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    sku: String,
    barcode: String,
    name: String,
    standardprice: Option<f64>,
    specialprice: Option<f64>,
}

fn read_catalog(reader: impl Read) -> AppResult<Vec<CatalogRecord>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<CatalogRecord>, _>>()
        .map_err(|e| AppError::Internal(format!("invalid catalog CSV: {e}")))
}

/// Load the catalog at `path`, skipping barcodes that are already stored.
pub async fn seed_from_csv(store: &ProductStore, path: &str) -> AppResult<usize> {
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::Internal(format!("cannot open {path}: {e}")))?;
    seed_from_reader(store, file).await
}

pub async fn seed_from_reader(store: &ProductStore, reader: impl Read) -> AppResult<usize> {
    let records = read_catalog(reader)?;
    store.ensure_schema().await?;

    let mut inserted = 0_usize;
    for record in &records {
        let result = sqlx::query(
            r#"
            INSERT INTO Products (SKU, Barcode, Name, StandardPrice, SpecialPrice)
            SELECT ?, ?, ?, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM Products WHERE Barcode = ?)
            "#,
        )
        .bind(&record.sku)
        .bind(&record.barcode)
        .bind(&record.name)
        .bind(record.standardprice)
        .bind(record.specialprice)
        .bind(&record.barcode)
        .execute(store.pool())
        .await?;
        inserted += result.rows_affected() as usize;
    }

    info!(read = records.len(), inserted, "Catalog seeding complete");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::{insert_row, memory_store};

    const CATALOG: &str = "\
sku,barcode,name,standardprice,specialprice
1001,9313820004501,\"7Up Lemonade Soda, 1.25 Litre\",2.8,2.5
1002,9300675009775,Coca Cola Diet Coke,3.2,
1003,9300000000000,Unpriced Item,,
";

    #[tokio::test]
    async fn seeds_all_rows_into_empty_store() {
        let store = memory_store().await;
        let inserted = seed_from_reader(&store, CATALOG.as_bytes()).await.unwrap();
        assert_eq!(inserted, 3);

        // The unpriced row is stored but not listed.
        let listed = store.list_priced_products().await.unwrap();
        assert_eq!(listed.len(), 2);
        let coke = listed.iter().find(|p| p.barcode == "9300675009775").unwrap();
        assert_eq!(coke.special_price, 0.0);
        let sprite = listed.iter().find(|p| p.barcode == "9313820004501").unwrap();
        assert_eq!(sprite.name, "7Up Lemonade Soda, 1.25 Litre");
    }

    #[tokio::test]
    async fn existing_barcodes_are_left_untouched() {
        let store = memory_store().await;
        insert_row(&store, "9313820004501", Some(9.99), None).await;

        let inserted = seed_from_reader(&store, CATALOG.as_bytes()).await.unwrap();
        assert_eq!(inserted, 2);
        let listed = store.list_priced_products().await.unwrap();
        assert_eq!(listed.len(), 2);
        let kept = listed.iter().find(|p| p.barcode == "9313820004501").unwrap();
        assert_eq!(kept.standard_price, 9.99);
        assert_eq!(kept.name, "Product 9313820004501");
    }

    #[tokio::test]
    async fn malformed_csv_is_rejected() {
        let store = memory_store().await;
        let bad = "sku,barcode,name,standardprice,specialprice\n1,2,x,not-a-number,\n";
        let err = seed_from_reader(&store, bad.as_bytes()).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
