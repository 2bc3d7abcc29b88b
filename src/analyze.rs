use std::collections::HashMap;

use tracing::debug;

use crate::{
    bonus::{calculate_bonus_by_profit, SellerProfit},
    data::{Dataset, Product, PurchaseItem, PurchaseRecord, Seller},
    error::ValidationError,
    money::round2,
    report::{ReportRow, TopProduct},
    revenue::calculate_simple_revenue,
};

/// The most products listed per seller in [`ReportRow::top_products`].
pub const TOP_PRODUCTS: usize = 10;

/// Computes the revenue of a single-item purchase, given the matched product.
pub type RevenueFn = dyn Fn(&PurchaseRecord, &Product) -> f64;

/// Computes a bonus from rank, total number of sellers, and profit.
pub type BonusFn = dyn Fn(usize, usize, &SellerProfit) -> f64;

/// The pricing policies used by [`analyze_sales_data`].
///
/// [`Options::default`] uses [`calculate_simple_revenue`] and
/// [`calculate_bonus_by_profit`]. Use [`Options::new`] to supply others.
pub struct Options {
    pub calculate_revenue: Box<RevenueFn>,
    pub calculate_bonus: Box<BonusFn>,
}

impl Options {
    /// Creates options with the given revenue and bonus policies.
    ///
    /// # Examples
    ///
    /// Pay everyone a flat bonus, whatever their rank:
    ///
    /// ```
    /// # use sellers::{calculate_simple_revenue, Options};
    /// let options = Options::new(calculate_simple_revenue, |_, _, _| 100.0);
    /// ```
    pub fn new(
        calculate_revenue: impl Fn(&PurchaseRecord, &Product) -> f64 + 'static,
        calculate_bonus: impl Fn(usize, usize, &SellerProfit) -> f64 + 'static,
    ) -> Self {
        Self {
            calculate_revenue: Box::new(calculate_revenue),
            calculate_bonus: Box::new(calculate_bonus),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new(calculate_simple_revenue, calculate_bonus_by_profit)
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options").finish_non_exhaustive()
    }
}

/// Running totals for one seller while purchases are folded in.
#[derive(Debug)]
struct SellerStats<'a> {
    seller: &'a Seller,
    revenue: f64,
    profit: f64,
    sales_count: u32,
    /// Quantity sold per SKU, in the order each SKU was first sold.
    products_sold: Vec<(&'a str, i64)>,
    sku_positions: HashMap<&'a str, usize>,
}

impl<'a> SellerStats<'a> {
    fn new(seller: &'a Seller) -> Self {
        Self {
            seller,
            revenue: 0.0,
            profit: 0.0,
            sales_count: 0,
            products_sold: Vec::new(),
            sku_positions: HashMap::new(),
        }
    }

    fn add_item(&mut self, item: &'a PurchaseItem, revenue: f64, cost: f64) {
        self.revenue = round2(self.revenue + revenue);
        self.profit += revenue - cost;
        let products_sold = &mut self.products_sold;
        let pos = *self.sku_positions.entry(item.sku.as_str()).or_insert_with(|| {
            products_sold.push((item.sku.as_str(), 0));
            products_sold.len() - 1
        });
        self.products_sold[pos].1 += item.quantity;
    }

    fn top_products(&self) -> Vec<TopProduct> {
        let mut products = self.products_sold.clone();
        products.sort_by(|a, b| b.1.cmp(&a.1));
        products
            .into_iter()
            .take(TOP_PRODUCTS)
            .map(|(sku, quantity)| TopProduct {
                sku: sku.to_string(),
                quantity,
            })
            .collect()
    }
}

/// Returns `profit` as a sort key: NaN ranks as zero, and so does -0.0.
fn ranking_profit(profit: f64) -> f64 {
    if profit.is_nan() || profit == 0.0 {
        0.0
    } else {
        profit
    }
}

/// Analyses `data` and returns one report row per seller, most profitable first.
///
/// Each purchase record counts as one sale for its seller. Every item in it
/// is priced with `options.calculate_revenue`, called with a copy of the
/// record holding just that item, and costed at the product's purchase price.
/// Sellers are then ranked by profit, and each one's bonus is computed with
/// `options.calculate_bonus`.
///
/// Records for unknown sellers, and items for unknown SKUs, are skipped
/// without error. Other items in the same record still count.
///
/// Revenue is rounded to cents after every item, while profit is only rounded
/// in the returned rows. Sellers with equal profit keep their input order.
///
/// # Errors
///
/// Returns a [`ValidationError`] if there are no sellers, no products, or no
/// purchase records, checked in that order.
pub fn analyze_sales_data(
    data: &Dataset,
    options: &Options,
) -> Result<Vec<ReportRow>, ValidationError> {
    if data.sellers.is_empty() {
        return Err(ValidationError::NoSellers);
    }
    if data.products.is_empty() {
        return Err(ValidationError::NoProducts);
    }
    if data.purchase_records.is_empty() {
        return Err(ValidationError::NoPurchaseRecords);
    }

    let seller_index: HashMap<&str, &Seller> =
        data.sellers.iter().map(|s| (s.id.as_str(), s)).collect();
    let product_index: HashMap<&str, &Product> =
        data.products.iter().map(|p| (p.sku.as_str(), p)).collect();

    let mut stats: Vec<SellerStats> = data.sellers.iter().map(SellerStats::new).collect();
    // First seller wins when ids repeat.
    let mut stats_index: HashMap<&str, usize> = HashMap::new();
    for (i, seller) in data.sellers.iter().enumerate() {
        stats_index.entry(seller.id.as_str()).or_insert(i);
    }

    let mut skipped_records = 0;
    let mut skipped_items = 0;
    for record in &data.purchase_records {
        let Some(&pos) = stats_index.get(record.seller_id.as_str()) else {
            debug!(seller_id = %record.seller_id, "skipping purchase record for unknown seller");
            skipped_records += 1;
            continue;
        };
        let seller = &mut stats[pos];
        seller.sales_count += 1;
        for item in &record.items {
            let Some(&product) = product_index.get(item.sku.as_str()) else {
                debug!(seller_id = %record.seller_id, sku = %item.sku, "skipping item for unknown product");
                skipped_items += 1;
                continue;
            };
            let revenue = (options.calculate_revenue)(&record.with_single_item(item), product);
            let cost = product.purchase_price * item.quantity as f64;
            seller.add_item(item, revenue, cost);
        }
    }

    // Stable, so equal profits keep input order.
    stats.sort_by(|a, b| ranking_profit(b.profit).total_cmp(&ranking_profit(a.profit)));

    let total = stats.len();
    let rows: Vec<ReportRow> = stats
        .iter()
        .enumerate()
        .map(|(rank, s)| {
            let seller = seller_index.get(s.seller.id.as_str()).copied().unwrap_or(s.seller);
            let bonus = (options.calculate_bonus)(
                rank,
                total,
                &SellerProfit {
                    seller,
                    profit: s.profit,
                },
            );
            ReportRow {
                seller_id: s.seller.id.clone(),
                name: s.seller.full_name(),
                revenue: round2(s.revenue),
                profit: round2(s.profit),
                sales_count: s.sales_count,
                top_products: s.top_products(),
                bonus,
            }
        })
        .collect();

    debug!(
        sellers = total,
        purchase_records = data.purchase_records.len(),
        skipped_records,
        skipped_items,
        "analysed sales data"
    );
    Ok(rows)
}
