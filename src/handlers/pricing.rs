use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    models::{Product, ProductPriceUpdateStatus},
    pricing, AppState,
};

// ── POST /pricing ────────────────────────────────────────────────────────────

/// Any body that does not parse, or any record without a positive
/// `standardprice`, rejects the whole request before storage is touched.
pub async fn post_pricing(
    State(state): State<AppState>,
    payload: Result<Json<Vec<Product>>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Vec<ProductPriceUpdateStatus>>)> {
    let Json(products) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected pricing payload");
        AppError::BadRequest(rejection.body_text())
    })?;

    for product in &products {
        product.check_standard_price().map_err(|msg| {
            warn!(barcode = %product.barcode, "Rejected pricing payload");
            AppError::BadRequest(msg)
        })?;
    }

    let start = Instant::now();
    let statuses = pricing::reconcile(&state.store, &products).await?;

    info!(
        count = statuses.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Processed pricing update"
    );

    Ok((StatusCode::OK, Json(statuses)))
}
