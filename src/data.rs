use anyhow::{Context, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

/// A seller, as found in the seller directory.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Seller {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Seller {
    /// Returns the seller's display name: first and last name, space-separated.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A catalog entry, keyed by SKU.
///
/// Only `sku` and `purchase_price` take part in the analysis.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Product {
    pub sku: String,
    pub purchase_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
}

/// One line of a purchase.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PurchaseItem {
    pub sku: String,
    /// Units sold. Whole-valued decimals such as `2.0` are accepted.
    #[serde(deserialize_with = "whole_quantity")]
    pub quantity: i64,
    pub sale_price: f64,
    /// Percentage discount, 0 to 100. Missing or `null` means no discount.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub discount: f64,
}

fn whole_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }
    match Number::deserialize(deserializer)? {
        Number::Int(n) => Ok(n),
        // Past 2^53 not every whole number is representable.
        Number::Float(x) if x.fract() == 0.0 && x.abs() <= 9_007_199_254_740_992.0 => Ok(x as i64),
        Number::Float(x) => Err(de::Error::custom(format!(
            "quantity must be a whole number of units, got {x}"
        ))),
    }
}

/// One purchase event, attributed to a single seller.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PurchaseRecord {
    pub seller_id: String,
    pub items: Vec<PurchaseItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_discount: Option<f64>,
}

impl PurchaseRecord {
    /// Returns a copy of this record whose only item is `item`.
    ///
    /// All other fields of the record are kept as they are.
    #[must_use]
    pub fn with_single_item(&self, item: &PurchaseItem) -> PurchaseRecord {
        PurchaseRecord {
            seller_id: self.seller_id.clone(),
            items: vec![item.clone()],
            receipt_id: self.receipt_id.clone(),
            date: self.date.clone(),
            customer_id: self.customer_id.clone(),
            total_amount: self.total_amount,
            total_discount: self.total_discount,
        }
    }
}

/// The input to an analysis: sellers, catalog, and purchases.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Dataset {
    #[serde(default)]
    pub sellers: Vec<Seller>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub purchase_records: Vec<PurchaseRecord>,
}

impl Dataset {
    /// Reads a dataset from the JSON file at `path`.
    ///
    /// The file holds a single object with `sellers`, `products`, and
    /// `purchase_records` arrays. A missing array reads as empty, which the
    /// analysis then rejects.
    ///
    /// # Errors
    ///
    /// Returns errors if the file cannot be opened, or is not valid JSON in
    /// the expected shape.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
            .with_context(|| format!("reading {}", path.display()))
    }

    /// Reads a dataset from JSON supplied by `rdr`.
    ///
    /// # Errors
    ///
    /// Returns any errors from reading or parsing the JSON.
    pub fn from_reader(rdr: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(rdr)?)
    }
}
