use std::future::Future;

use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::{Product, ProductPriceUpdateStatus, UpdateStatus};

/// Storage operations the reconciler needs. Implemented by `db::ProductStore`.
pub trait PriceStore {
    /// Number of rows whose barcode and both prices equal the given values exactly.
    fn count_matching(
        &self,
        barcode: &str,
        standard_price: f64,
        special_price: f64,
    ) -> impl Future<Output = AppResult<i64>> + Send;

    /// Overwrites both prices of the row keyed by `barcode`, returning rows affected.
    fn update_product(
        &self,
        barcode: &str,
        standard_price: f64,
        special_price: f64,
    ) -> impl Future<Output = AppResult<u64>> + Send;
}

/// Applies incoming pricing to storage one record at a time, in input order.
///
/// A record already stored with identical prices is `Ignored`; otherwise an
/// update is attempted and the row count decides between `Updated` and
/// `NotFound`. The first storage error aborts the whole batch.
pub async fn reconcile<S>(
    store: &S,
    products: &[Product],
) -> AppResult<Vec<ProductPriceUpdateStatus>>
where
    S: PriceStore + Sync,
{
    let mut statuses = Vec::with_capacity(products.len());

    for product in products {
        let status = reconcile_one(store, product).await?;
        debug!(barcode = %product.barcode, status = ?status, "Reconciled pricing");
        statuses.push(ProductPriceUpdateStatus {
            barcode: product.barcode.clone(),
            status,
        });
    }

    let count = |wanted: UpdateStatus| statuses.iter().filter(|s| s.status == wanted).count();
    info!(
        total = statuses.len(),
        updated = count(UpdateStatus::Updated),
        ignored = count(UpdateStatus::Ignored),
        notfound = count(UpdateStatus::NotFound),
        "Pricing batch reconciled"
    );

    Ok(statuses)
}

async fn reconcile_one<S>(store: &S, product: &Product) -> AppResult<UpdateStatus>
where
    S: PriceStore + Sync,
{
    let matching = store
        .count_matching(&product.barcode, product.standard_price, product.special_price)
        .await?;
    if matching > 0 {
        return Ok(UpdateStatus::Ignored);
    }

    let affected = store
        .update_product(&product.barcode, product.standard_price, product.special_price)
        .await?;

    Ok(if affected >= 1 {
        UpdateStatus::Updated
    } else {
        UpdateStatus::NotFound
    })
}
