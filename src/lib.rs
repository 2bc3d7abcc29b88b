#![doc = include_str!("../README.md")]
pub mod analyze;
pub mod bonus;
pub mod data;
pub mod error;
pub mod money;
pub mod report;
pub mod revenue;

pub use analyze::{analyze_sales_data, Options, TOP_PRODUCTS};
pub use bonus::{calculate_bonus_by_profit, SellerProfit};
pub use data::{Dataset, Product, PurchaseItem, PurchaseRecord, Seller};
pub use error::ValidationError;
pub use report::{Report, ReportRow, TopProduct};
pub use revenue::calculate_simple_revenue;
