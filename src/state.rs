use std::collections::BTreeSet;

use crate::config::DashboardConfig;
use crate::data::filter::FilterSelection;
use crate::data::loader::LoadError;
use crate::data::model::Table;
use crate::pipeline::{recompute, Dashboard};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The two filterable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Region,
    Category,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None when the load failed).
    pub table: Option<Table>,

    /// Current multi-select values.
    pub selection: FilterSelection,

    /// Output of the last pipeline run.
    pub dashboard: Option<Dashboard>,

    /// Blocking error message shown instead of the dashboard.
    pub load_error: Option<String>,
}

impl AppState {
    /// Build the state from the one-time startup load.
    pub fn from_load(config: DashboardConfig, loaded: Result<Table, LoadError>) -> Self {
        let mut state = Self {
            config,
            table: None,
            selection: FilterSelection::default(),
            dashboard: None,
            load_error: None,
        };
        match loaded {
            Ok(table) => state.set_table(table),
            Err(e) => {
                log::error!(
                    "Failed to load {}: {e}",
                    state.config.data_path.display()
                );
                state.load_error = Some(format!(
                    "Could not load {}: {e}",
                    state.config.data_path.display()
                ));
            }
        }
        state
    }

    /// Ingest the loaded table with every region and category selected.
    pub fn set_table(&mut self, table: Table) {
        self.selection = FilterSelection::all(&table);
        self.table = Some(table);
        self.load_error = None;
        self.refresh();
    }

    /// Re-run filter → aggregate → present for the current selection.
    pub fn refresh(&mut self) {
        if let Some(table) = &self.table {
            self.dashboard = Some(recompute(table, &self.selection, &self.config));
        }
    }

    /// All distinct values of `dim`, in first-appearance order.
    pub fn options(&self, dim: Dimension) -> &[String] {
        match (&self.table, dim) {
            (Some(t), Dimension::Region) => t.regions(),
            (Some(t), Dimension::Category) => t.categories(),
            (None, _) => &[],
        }
    }

    pub fn selected(&self, dim: Dimension) -> &BTreeSet<String> {
        match dim {
            Dimension::Region => &self.selection.regions,
            Dimension::Category => &self.selection.categories,
        }
    }

    fn selected_mut(&mut self, dim: Dimension) -> &mut BTreeSet<String> {
        match dim {
            Dimension::Region => &mut self.selection.regions,
            Dimension::Category => &mut self.selection.categories,
        }
    }

    /// Replace the whole selection of one dimension.
    pub fn set_selection(&mut self, dim: Dimension, values: BTreeSet<String>) {
        *self.selected_mut(dim) = values;
        self.refresh();
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        let selected = self.selected_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refresh();
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        let all = self.options(dim).iter().cloned().collect();
        self.set_selection(dim, all);
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.set_selection(dim, BTreeSet::new());
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::model::record;

    fn state() -> AppState {
        let table = Table::from_records(vec![
            record("East", "Tech", "First Class", 100.0, 20.0, "1", 2020, 1),
            record("East", "Tech", "First Class", 50.0, -5.0, "1", 2020, 1),
            record("West", "Office", "Same Day", 30.0, 10.0, "2", 2020, 2),
        ]);
        AppState::from_load(DashboardConfig::default(), Ok(table))
    }

    fn total_sales(state: &AppState) -> i64 {
        state.dashboard.as_ref().unwrap().aggregates.total_sales
    }

    #[test]
    fn starts_with_everything_selected() {
        let state = state();
        assert_eq!(state.selected(Dimension::Region).len(), 2);
        assert_eq!(state.selected(Dimension::Category).len(), 2);
        assert_eq!(total_sales(&state), 180);
        assert_eq!(state.options(Dimension::Region), ["East", "West"]);
    }

    #[test]
    fn toggling_reruns_the_pipeline() {
        let mut state = state();

        state.toggle(Dimension::Region, "East");
        assert_eq!(total_sales(&state), 30);

        state.toggle(Dimension::Region, "East");
        assert_eq!(total_sales(&state), 180);
    }

    #[test]
    fn select_none_then_all() {
        let mut state = state();

        state.select_none(Dimension::Category);
        assert_eq!(state.dashboard.as_ref().unwrap().visible_records, 0);
        assert_eq!(state.dashboard.as_ref().unwrap().charts.kpis[2].value, "N/A");

        state.select_all(Dimension::Category);
        assert_eq!(state.dashboard.as_ref().unwrap().visible_records, 3);
    }

    #[test]
    fn set_selection_replaces_previous_values() {
        let mut state = state();
        state.set_selection(Dimension::Category, BTreeSet::from(["Office".to_string()]));

        assert_eq!(
            state.selected(Dimension::Category),
            &BTreeSet::from(["Office".to_string()])
        );
        assert_eq!(total_sales(&state), 30);
        // The other dimension is untouched.
        assert_eq!(state.selected(Dimension::Region).len(), 2);
    }

    #[test]
    fn load_failure_is_kept_as_blocking_message() {
        let config = DashboardConfig {
            data_path: PathBuf::from("missing.csv"),
            ..DashboardConfig::default()
        };
        let state = AppState::from_load(config, Err(LoadError::MissingColumn("Sales".into())));

        assert!(state.table.is_none());
        assert!(state.dashboard.is_none());
        assert!(state.options(Dimension::Region).is_empty());
        let msg = state.load_error.unwrap();
        assert!(msg.contains("missing.csv"));
        assert!(msg.contains("Sales"));
    }
}
