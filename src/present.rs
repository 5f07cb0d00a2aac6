//! Presentation adapter: aggregated tables → chart specifications and KPI
//! strings. Nothing here draws; `ui::charts` renders these specs.

use crate::config::DashboardConfig;
use crate::data::aggregate::{AggregateResult, GroupCount, GroupTotal, YearMonthProfit};

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// Vertical bars, drawn left to right in the given order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub bars: Vec<Bar>,
}

/// One line of a line chart; points are `[x, y]` in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub legend_title: String,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChartSpec {
    pub title: String,
    /// Inner radius ratio in `0.0..1.0`; `0.0` is a full pie.
    pub hole: f32,
    pub slices: Vec<PieSlice>,
    /// Drawn in place of the pie when there is nothing to slice.
    pub empty_text: String,
}

impl PieChartSpec {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Fraction of the whole taken by slice `index`; `0.0` for an empty pie.
    pub fn share(&self, index: usize) -> f64 {
        let total = self.total();
        match self.slices.get(index) {
            Some(slice) if total > 0.0 => slice.value / total,
            _ => 0.0,
        }
    }
}

/// A headline metric: label text plus its formatted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiLabel {
    pub title: String,
    pub value: String,
}

/// Everything the dashboard layout needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCharts {
    /// Total profit, total sales, average sale – left to right.
    pub kpis: Vec<KpiLabel>,
    pub profit_by_category: BarChartSpec,
    pub profit_by_region: BarChartSpec,
    pub profit_over_time: LineChartSpec,
    pub sales_by_category: PieChartSpec,
    pub ship_modes: PieChartSpec,
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Map every part of `result` to its chart or label.
pub fn present(result: &AggregateResult, config: &DashboardConfig) -> DashboardCharts {
    let labels = &config.labels;

    DashboardCharts {
        kpis: kpi_labels(result, config),
        profit_by_category: bar_chart(
            labels.profit_by_category,
            labels.category_axis,
            labels.profit_axis,
            &result.profit_by_category,
        ),
        profit_by_region: bar_chart(
            labels.profit_by_region,
            labels.region_axis,
            labels.sales_axis,
            &result.profit_by_region,
        ),
        profit_over_time: LineChartSpec {
            title: labels.profit_over_time.to_string(),
            x_title: labels.month_axis.to_string(),
            y_title: labels.profit_axis.to_string(),
            legend_title: labels.year_legend.to_string(),
            series: series_by_year(&result.profit_by_year_month),
        },
        sales_by_category: PieChartSpec {
            title: labels.sales_by_category.to_string(),
            hole: config.pie_hole,
            slices: result
                .sales_by_category
                .iter()
                .map(|g| PieSlice {
                    label: g.key.clone(),
                    value: g.value,
                })
                .collect(),
            empty_text: config.placeholder.to_string(),
        },
        ship_modes: count_pie(labels.ship_modes, config, &result.count_by_ship_mode),
    }
}

fn bar_chart(title: &str, x_title: &str, y_title: &str, groups: &[GroupTotal]) -> BarChartSpec {
    BarChartSpec {
        title: title.to_string(),
        x_title: x_title.to_string(),
        y_title: y_title.to_string(),
        bars: groups
            .iter()
            .map(|g| Bar {
                label: g.key.clone(),
                value: g.value,
            })
            .collect(),
    }
}

/// One series per year (first-appearance order), `x = month`, `y = profit`.
/// Points keep the row order of `rows`.
fn series_by_year(rows: &[YearMonthProfit]) -> Vec<LineSeries> {
    let mut series: Vec<(i32, Vec<[f64; 2]>)> = Vec::new();
    for row in rows {
        let point = [f64::from(row.month), row.profit];
        match series.iter_mut().find(|(year, _)| *year == row.year) {
            Some((_, points)) => points.push(point),
            None => series.push((row.year, vec![point])),
        }
    }
    series
        .into_iter()
        .map(|(year, points)| LineSeries {
            label: year.to_string(),
            points,
        })
        .collect()
}

fn count_pie(title: &str, config: &DashboardConfig, counts: &[GroupCount]) -> PieChartSpec {
    PieChartSpec {
        title: title.to_string(),
        hole: config.pie_hole,
        slices: counts
            .iter()
            .map(|c| PieSlice {
                label: c.key.clone(),
                value: c.count as f64,
            })
            .collect(),
        empty_text: config.placeholder.to_string(),
    }
}

fn kpi_labels(result: &AggregateResult, config: &DashboardConfig) -> Vec<KpiLabel> {
    let labels = &config.labels;
    let average = match &result.average_sale {
        Ok(avg) => format_currency(*avg),
        Err(e) => {
            log::warn!("{e}; showing placeholder");
            config.placeholder.to_string()
        }
    };

    vec![
        KpiLabel {
            title: labels.total_profit.to_string(),
            value: format_currency(result.total_profit),
        },
        KpiLabel {
            title: labels.total_sales.to_string(),
            value: format_currency(result.total_sales),
        },
        KpiLabel {
            title: labels.average_sale.to_string(),
            value: average,
        },
    ]
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `$ 1,234,567` style: dollar sign, space, comma-grouped whole units.
pub fn format_currency(value: i64) -> String {
    format!("$ {}", group_thousands(value))
}

/// Insert `,` every three digits: `-1234567` → `-1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
