use crate::config::DashboardConfig;
use crate::data::aggregate::{aggregate, AggregateResult};
use crate::data::filter::{filter, FilterSelection};
use crate::data::model::Table;
use crate::present::{present, DashboardCharts};

/// Output of one full filter → aggregate → present run.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Records that passed the filter.
    pub visible_records: usize,
    pub aggregates: AggregateResult,
    pub charts: DashboardCharts,
}

/// Recompute the whole dashboard for `selection`. Pure: `table` is only read.
pub fn recompute(table: &Table, selection: &FilterSelection, config: &DashboardConfig) -> Dashboard {
    let view = filter(table, selection);
    log::debug!(
        "recompute: {} of {} records visible ({} regions, {} categories selected)",
        view.len(),
        table.len(),
        selection.regions.len(),
        selection.categories.len()
    );

    let aggregates = aggregate(&view);
    let charts = present(&aggregates, config);

    Dashboard {
        visible_records: view.len(),
        aggregates,
        charts,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::aggregate::AggregateError;
    use crate::data::model::record;

    fn table() -> Table {
        Table::from_records(vec![
            record("East", "Tech", "First Class", 100.0, 20.0, "1", 2020, 1),
            record("East", "Tech", "First Class", 50.0, -5.0, "1", 2020, 1),
            record("West", "Office", "Same Day", 30.0, 10.0, "2", 2020, 2),
        ])
    }

    #[test]
    fn west_only_selection() {
        let table = table();
        let selection = FilterSelection {
            regions: BTreeSet::from(["West".to_string()]),
            ..FilterSelection::all(&table)
        };

        let dashboard = recompute(&table, &selection, &DashboardConfig::default());
        assert_eq!(dashboard.visible_records, 1);
        assert_eq!(dashboard.aggregates.total_sales, 30);
        assert_eq!(dashboard.aggregates.total_profit, 10);
        assert_eq!(dashboard.aggregates.average_sale, Ok(30));

        let bars = &dashboard.charts.profit_by_category.bars;
        assert_eq!(bars.len(), 1);
        assert_eq!((bars[0].label.as_str(), bars[0].value), ("Office", 10.0));
    }

    #[test]
    fn nothing_selected_renders_placeholder() {
        let table = table();
        let selection = FilterSelection {
            categories: BTreeSet::new(),
            ..FilterSelection::all(&table)
        };

        let dashboard = recompute(&table, &selection, &DashboardConfig::default());
        assert_eq!(dashboard.visible_records, 0);
        assert_eq!(
            dashboard.aggregates.average_sale,
            Err(AggregateError::DivisionByZero)
        );
        assert_eq!(dashboard.charts.kpis[2].value, "N/A");
        assert_eq!(dashboard.charts.kpis[1].value, "$ 0");
    }
}
