use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names – the fixed header schema of the sales file
// ---------------------------------------------------------------------------

pub const COL_REGION: &str = "Region";
pub const COL_CATEGORY: &str = "Category";
pub const COL_SHIP_MODE: &str = "Ship Mode";
pub const COL_SALES: &str = "Sales";
pub const COL_PROFIT: &str = "Profit";
pub const COL_ORDER_ID: &str = "Order ID";
pub const COL_ORDER_YEAR: &str = "order year";
pub const COL_ORDER_MONTH: &str = "order month";

/// Every column the loader requires, in header order of the reference file.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_REGION,
    COL_CATEGORY,
    COL_SHIP_MODE,
    COL_SALES,
    COL_PROFIT,
    COL_ORDER_ID,
    COL_ORDER_YEAR,
    COL_ORDER_MONTH,
];

// ---------------------------------------------------------------------------
// Record – one row of the sales file
// ---------------------------------------------------------------------------

/// A single sales line item.
///
/// `order_id` is not unique: an order spanning several line items appears
/// once per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Ship Mode")]
    pub ship_mode: String,
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "order year")]
    pub order_year: i32,
    #[serde(rename = "order month")]
    pub order_month: u32,
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
    /// Distinct regions in order of first appearance.
    regions: Vec<String>,
    /// Distinct categories in order of first appearance.
    categories: Vec<String>,
}

impl Table {
    /// Build the distinct-value indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        let mut categories: Vec<String> = Vec::new();

        for rec in &records {
            if !regions.contains(&rec.region) {
                regions.push(rec.region.clone());
            }
            if !categories.contains(&rec.category) {
                categories.push(rec.category.clone());
            }
        }

        Table {
            records,
            regions,
            categories,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::too_many_arguments)]
pub(crate) fn record(
    region: &str,
    category: &str,
    ship_mode: &str,
    sales: f64,
    profit: f64,
    order_id: &str,
    order_year: i32,
    order_month: u32,
) -> Record {
    Record {
        region: region.to_string(),
        category: category.to_string(),
        ship_mode: ship_mode.to_string(),
        sales,
        profit,
        order_id: order_id.to_string(),
        order_year,
        order_month,
    }
}
