use anyhow::Result;
use serde::Serialize;

use std::{fmt::Display, io::Write};

use crate::{
    analyze::{analyze_sales_data, Options},
    data::Dataset,
    error::ValidationError,
    money::Usd,
};

/// A product and the quantity of it one seller sold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopProduct {
    pub sku: String,
    pub quantity: i64,
}

/// The results for one seller.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportRow {
    pub seller_id: String,
    pub name: String,
    /// Revenue, rounded to cents.
    pub revenue: f64,
    /// Revenue less purchase cost, rounded to cents.
    pub profit: f64,
    /// Number of purchase records attributed to the seller.
    pub sales_count: u32,
    /// Best-selling products by quantity, at most [`crate::TOP_PRODUCTS`].
    pub top_products: Vec<TopProduct>,
    pub bonus: f64,
}

/// Holds the ranked results of an analysis.
///
/// To create a `Report`, use [`Report::analyze`].
///
/// To get a printable version of the report, use its [`Display`] implementation.
/// For machine-readable output, use [`Report::write_json`] or
/// [`Report::write_csv`].
#[derive(Debug, Default, PartialEq)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Analyses `data` with `options` and returns the report.
    ///
    /// # Errors
    ///
    /// Returns any [`ValidationError`] from [`analyze_sales_data`].
    pub fn analyze(data: &Dataset, options: &Options) -> Result<Self, ValidationError> {
        Ok(Self {
            rows: analyze_sales_data(data, options)?,
        })
    }

    /// Returns the rows, most profitable seller first.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    #[must_use]
    pub fn total_revenue(&self) -> f64 {
        self.rows.iter().map(|r| r.revenue).sum()
    }

    #[must_use]
    pub fn total_profit(&self) -> f64 {
        self.rows.iter().map(|r| r.profit).sum()
    }

    #[must_use]
    pub fn total_bonus(&self) -> f64 {
        self.rows.iter().map(|r| r.bonus).sum()
    }

    /// Writes the rows to `wtr` as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns any errors from serializing or writing.
    pub fn write_json(&self, mut wtr: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut wtr, &self.rows)?;
        writeln!(wtr)?;
        Ok(())
    }

    /// Writes the rows to `wtr` as CSV, with a header line.
    ///
    /// The top products column holds `SKU:QUANTITY` pairs separated by `;`.
    ///
    /// # Errors
    ///
    /// Returns any errors from writing.
    pub fn write_csv(&self, wtr: impl Write) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(wtr);
        for (rank, row) in self.rows.iter().enumerate() {
            wtr.serialize(CsvRow {
                rank: rank + 1,
                seller_id: &row.seller_id,
                name: &row.name,
                sales_count: row.sales_count,
                revenue: format!("{:.2}", row.revenue),
                profit: format!("{:.2}", row.profit),
                bonus: format!("{:.2}", row.bonus),
                top_products: row
                    .top_products
                    .iter()
                    .map(|p| format!("{}:{}", p.sku, p.quantity))
                    .collect::<Vec<_>>()
                    .join(";"),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.name.len())
            .chain(std::iter::once("Seller".len()))
            .max()
            .unwrap_or_default();
        writeln!(
            f,
            "{:>4} {:width$} {:>6} {:>12} {:>12} {:>12}",
            "Rank", "Seller", "Sales", "Revenue", "Profit", "Bonus"
        )?;
        let length = width + 52;
        writeln!(f, "{:-<length$}", "")?;
        for (rank, row) in self.rows.iter().enumerate() {
            writeln!(
                f,
                "{:>4} {:width$} {:6} {} {} {}",
                rank + 1,
                row.name,
                row.sales_count,
                Usd(row.revenue),
                Usd(row.profit),
                Usd(row.bonus),
            )?;
        }
        writeln!(f, "{:-<length$}", "")?;
        let sales: u32 = self.rows.iter().map(|r| r.sales_count).sum();
        writeln!(
            f,
            "{:>4} {:width$} {sales:6} {} {} {}",
            "",
            "Total",
            Usd(self.total_revenue()),
            Usd(self.total_profit()),
            Usd(self.total_bonus()),
        )?;
        Ok(())
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    seller_id: &'a str,
    name: &'a str,
    sales_count: u32,
    revenue: String,
    profit: String,
    bonus: String,
    top_products: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        let data = Dataset::from_path("testdata/sample.json").unwrap();
        Report::analyze(&data, &Options::default()).unwrap()
    }

    #[test]
    fn analyze_fn_returns_one_row_per_seller() {
        let report = sample_report();
        assert_eq!(report.rows().len(), 4);
        assert_eq!(report.rows()[0].seller_id, "seller_2");
    }

    #[test]
    fn analyze_fn_propagates_validation_errors() {
        let err = Report::analyze(&Dataset::default(), &Options::default()).unwrap_err();
        assert_eq!(err, ValidationError::NoSellers);
    }

    #[test]
    fn totals_sum_over_all_sellers() {
        let report = sample_report();
        assert_eq!(report.total_revenue(), 700.0);
        assert_eq!(report.total_profit(), 355.0);
        assert_eq!(report.total_bonus(), 48.0);
    }

    #[test]
    fn display_renders_ranked_table_with_totals() {
        let text = sample_report().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("Rank Seller"));
        assert!(lines[2].starts_with("   1 Maria Ivanova"), "{}", lines[2]);
        assert!(lines[2].ends_with("      520.00       250.00        37.50"), "{}", lines[2]);
        assert!(lines[5].starts_with("   4 Olga Kuznetsova"), "{}", lines[5]);
        assert!(lines[7].contains("Total"));
        assert!(lines[7].ends_with("      700.00       355.00        48.00"), "{}", lines[7]);
    }

    #[test]
    fn write_json_fn_emits_row_array() {
        let mut buf = Vec::new();
        sample_report().write_json(&mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["seller_id"], "seller_2");
        assert_eq!(rows[0]["name"], "Maria Ivanova");
        assert_eq!(rows[0]["bonus"], 37.5);
        assert_eq!(rows[0]["top_products"][0]["sku"], "SKU_002");
        assert_eq!(rows[0]["top_products"][0]["quantity"], 5);
    }

    #[test]
    fn write_csv_fn_flattens_top_products() {
        let mut buf = Vec::new();
        sample_report().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "rank,seller_id,name,sales_count,revenue,profit,bonus,top_products"
        );
        assert_eq!(
            lines[1],
            "1,seller_2,Maria Ivanova,2,520.00,250.00,37.50,SKU_002:5;SKU_001:4;SKU_003:3"
        );
        assert_eq!(lines[4], "4,seller_4,Olga Kuznetsova,0,0.00,0.00,0.00,");
    }
}
