use serde::Serialize;

use crate::{data::Seller, money::round2};

/// A seller together with their accumulated profit, as seen by a bonus policy.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SellerProfit<'a> {
    #[serde(flatten)]
    pub seller: &'a Seller,
    /// Profit before rounding.
    pub profit: f64,
}

/// Returns the bonus for the seller ranked `rank` of `total`, by profit.
///
/// `rank` is 0-based, with the most profitable seller first. The tiers are
/// checked in order, and the first match wins:
///
/// * Rank 0 earns 15% of profit
/// * Ranks 1 and 2 earn 10%
/// * The last-ranked seller earns nothing
/// * Everyone else earns 5%
///
/// So a sole seller takes the top tier, and the third of three sellers
/// still earns 10%. The bonus is rounded to cents; a NaN profit counts as 0.
///
/// # Examples
///
/// ```
/// # use sellers::{calculate_bonus_by_profit, Seller, SellerProfit};
/// let seller = Seller::default();
/// let ranked = SellerProfit { seller: &seller, profit: 1000.0 };
/// assert_eq!(calculate_bonus_by_profit(0, 5, &ranked), 150.0);
/// assert_eq!(calculate_bonus_by_profit(3, 5, &ranked), 50.0);
/// assert_eq!(calculate_bonus_by_profit(4, 5, &ranked), 0.0);
/// ```
#[must_use]
pub fn calculate_bonus_by_profit(rank: usize, total: usize, seller: &SellerProfit) -> f64 {
    let profit = if seller.profit.is_nan() {
        0.0
    } else {
        seller.profit
    };
    if rank == 0 {
        round2(profit * 0.15)
    } else if rank <= 2 {
        round2(profit * 0.10)
    } else if rank + 1 == total {
        0.0
    } else {
        round2(profit * 0.05)
    }
}
