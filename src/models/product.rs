use serde::{Deserialize, Deserializer, Serialize};

/// Catalog entry as exchanged over HTTP.
///
/// `barcode` is the business key for every lookup and update; `sku` and
/// `name` are carried along but never reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub name: String,
    /// Mandatory on input: a missing or null value fails deserialization.
    #[serde(rename = "standardprice")]
    pub standard_price: f64,
    /// A missing or null special price is held as `0.0`.
    #[serde(rename = "specialprice", default, deserialize_with = "null_as_zero")]
    pub special_price: f64,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Product {
    /// Pricing input is only accepted with a strictly positive standard price.
    pub fn check_standard_price(&self) -> Result<(), String> {
        if self.standard_price > 0.0 {
            Ok(())
        } else {
            Err(format!(
                "standardprice must be provided and greater than zero (barcode {:?})",
                self.barcode
            ))
        }
    }
}

/// Raw `Products` row; a NULL special price is mapped to zero on conversion.
#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub sku: String,
    pub barcode: String,
    pub name: String,
    pub standard_price: f64,
    pub special_price: Option<f64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            sku: row.sku,
            barcode: row.barcode,
            name: row.name,
            standard_price: row.standard_price,
            special_price: row.special_price.unwrap_or(0.0),
        }
    }
}

// ── Reconciliation outcome ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Updated,
    Ignored,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPriceUpdateStatus {
    pub barcode: String,
    pub status: UpdateStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<Product, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn null_special_price_becomes_zero() {
        let p = parse(json!({
            "barcode": "9300675009775",
            "name": "Coca Cola Diet Coke",
            "standardprice": 3.5,
            "specialprice": null
        }))
        .unwrap();
        assert_eq!(p.special_price, 0.0);
        assert_eq!(p.sku, "");
    }

    #[test]
    fn missing_special_price_becomes_zero() {
        let p = parse(json!({ "barcode": "A", "standardprice": 5 })).unwrap();
        assert_eq!(p.special_price, 0.0);
        assert_eq!(p.standard_price, 5.0);
    }

    #[test]
    fn missing_standard_price_is_rejected() {
        assert!(parse(json!({ "barcode": "A", "specialprice": 2.5 })).is_err());
    }

    #[test]
    fn null_standard_price_is_rejected() {
        assert!(parse(json!({ "barcode": "A", "standardprice": null })).is_err());
    }

    #[test]
    fn zero_standard_price_fails_check() {
        let p = parse(json!({ "barcode": "A", "standardprice": 0 })).unwrap();
        assert!(p.check_standard_price().is_err());
    }

    #[test]
    fn negative_standard_price_fails_check() {
        let p = parse(json!({ "barcode": "A", "standardprice": -1.0 })).unwrap();
        assert!(p.check_standard_price().is_err());
    }

    #[test]
    fn positive_standard_price_passes_check() {
        let p = parse(json!({ "barcode": "A", "standardprice": 2.8 })).unwrap();
        assert!(p.check_standard_price().is_ok());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let p = Product {
            sku: "S1".to_string(),
            barcode: "A".to_string(),
            name: "Loaf".to_string(),
            standard_price: 6.75,
            special_price: 0.0,
        };
        assert_eq!(
            serde_json::to_value(&p).unwrap(),
            json!({
                "sku": "S1",
                "barcode": "A",
                "name": "Loaf",
                "standardprice": 6.75,
                "specialprice": 0.0
            })
        );
    }

    #[test]
    fn row_with_null_special_price_maps_to_zero() {
        let row = ProductRow {
            sku: "S1".to_string(),
            barcode: "A".to_string(),
            name: "Loaf".to_string(),
            standard_price: 4.0,
            special_price: None,
        };
        assert_eq!(Product::from(row).special_price, 0.0);
    }

    #[test]
    fn status_uses_lowercase_names() {
        let statuses = [UpdateStatus::Updated, UpdateStatus::Ignored, UpdateStatus::NotFound];
        let encoded: Vec<String> = statuses
            .iter()
            .map(|s| serde_json::to_string(s).unwrap())
            .collect();
        assert_eq!(encoded, vec!["\"updated\"", "\"ignored\"", "\"notfound\""]);
    }
}
