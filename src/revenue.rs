use crate::data::{Product, PurchaseRecord};

/// Returns the revenue from the items in `purchase`.
///
/// Each item contributes its sale price times its quantity, less its
/// percentage discount. A NaN discount counts as no discount. Neither the
/// discount nor the quantity is range-checked, so a discount over 100 or a
/// negative quantity gives a negative contribution.
///
/// `_product` is the catalog entry the caller matched for the purchase; this
/// policy doesn't need it.
///
/// # Examples
///
/// ```
/// # use sellers::{calculate_simple_revenue, Product, PurchaseItem, PurchaseRecord};
/// let purchase = PurchaseRecord {
///     seller_id: "seller_1".into(),
///     items: vec![PurchaseItem {
///         sku: "SKU_001".into(),
///         quantity: 4,
///         sale_price: 25.0,
///         discount: 10.0,
///     }],
///     ..Default::default()
/// };
/// assert_eq!(calculate_simple_revenue(&purchase, &Product::default()), 90.0);
/// ```
#[must_use]
pub fn calculate_simple_revenue(purchase: &PurchaseRecord, _product: &Product) -> f64 {
    purchase.items.iter().fold(0.0, |total, item| {
        let discount = if item.discount.is_nan() {
            0.0
        } else {
            item.discount
        };
        total + item.sale_price * item.quantity as f64 * (1.0 - discount / 100.0)
    })
}
