use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use thiserror::Error;

use super::filter::FilteredView;
use super::model::Record;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AggregateError {
    /// The view holds no orders, so there is nothing to average over.
    #[error("average sale is undefined: the view contains no orders")]
    DivisionByZero,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One group of a grouped sum (e.g. the `Technology` category and its profit).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub value: f64,
}

/// Summed profit for one `(order year, order month)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct YearMonthProfit {
    pub year: i32,
    pub month: u32,
    pub profit: f64,
}

/// Number of records sharing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// Every summary the dashboard shows, computed from one [`FilteredView`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// Sum of sales, truncated toward zero.
    pub total_sales: i64,
    /// Sum of profit, truncated toward zero.
    pub total_profit: i64,
    pub distinct_orders: usize,
    pub average_sale: Result<i64, AggregateError>,
    /// Ascending by summed profit.
    pub profit_by_category: Vec<GroupTotal>,
    /// Ascending by summed profit.
    pub profit_by_region: Vec<GroupTotal>,
    /// Ascending by summed sales.
    pub sales_by_category: Vec<GroupTotal>,
    /// First-appearance order of each pair; not sorted chronologically.
    pub profit_by_year_month: Vec<YearMonthProfit>,
    /// Most frequent first.
    pub count_by_ship_mode: Vec<GroupCount>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute all dashboard summaries for `view`.
pub fn aggregate(view: &FilteredView<'_>) -> AggregateResult {
    let total_sales = truncate(view.iter().map(|r| r.sales).sum());
    let total_profit = truncate(view.iter().map(|r| r.profit).sum());
    let distinct_orders = distinct_order_count(view);

    let profit_by_category = group_sum(view, |r| r.category.clone(), |r| r.profit);
    let profit_by_region = group_sum(view, |r| r.region.clone(), |r| r.profit);
    let sales_by_category = group_sum(view, |r| r.category.clone(), |r| r.sales);
    let profit_by_year_month = group_sum(view, |r| (r.order_year, r.order_month), |r| r.profit)
        .into_iter()
        .map(|((year, month), profit)| YearMonthProfit {
            year,
            month,
            profit,
        })
        .collect();

    AggregateResult {
        total_sales,
        total_profit,
        distinct_orders,
        average_sale: average_of(total_sales, distinct_orders),
        profit_by_category: sorted_ascending(profit_by_category),
        profit_by_region: sorted_ascending(profit_by_region),
        sales_by_category: sorted_ascending(sales_by_category),
        profit_by_year_month,
        count_by_ship_mode: count_descending(view, |r| r.ship_mode.clone()),
    }
}

/// Number of distinct `Order ID` values in `view`.
pub fn distinct_order_count(view: &FilteredView<'_>) -> usize {
    view.iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Truncated total sales divided by the distinct order count, truncated again.
fn average_of(total_sales: i64, orders: usize) -> Result<i64, AggregateError> {
    if orders == 0 {
        return Err(AggregateError::DivisionByZero);
    }
    Ok(truncate(total_sales as f64 / orders as f64))
}

/// Drop the fractional part (toward zero). Display values are whole units.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

// -- Grouping helpers --

/// Sum `value` per `key`, groups in order of first appearance.
fn group_sum<K, FK, FV>(view: &FilteredView<'_>, key: FK, value: FV) -> Vec<(K, f64)>
where
    K: Hash + Eq + Clone,
    FK: Fn(&Record) -> K,
    FV: Fn(&Record) -> f64,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, f64)> = Vec::new();

    for rec in view.iter() {
        let k = key(rec);
        match index.get(&k) {
            Some(&slot) => groups[slot].1 += value(rec),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, value(rec)));
            }
        }
    }
    groups
}

/// Stable ascending sort; ties keep first-appearance order.
fn sorted_ascending(groups: Vec<(String, f64)>) -> Vec<GroupTotal> {
    let mut totals: Vec<GroupTotal> = groups
        .into_iter()
        .map(|(key, value)| GroupTotal { key, value })
        .collect();
    totals.sort_by(|a, b| a.value.total_cmp(&b.value));
    totals
}

/// Count records per `key`, most frequent first; ties keep first appearance.
fn count_descending<FK>(view: &FilteredView<'_>, key: FK) -> Vec<GroupCount>
where
    FK: Fn(&Record) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<GroupCount> = Vec::new();

    for rec in view.iter() {
        let k = key(rec);
        match index.get(&k) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(k.clone(), counts.len());
                counts.push(GroupCount { key: k, count: 1 });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
