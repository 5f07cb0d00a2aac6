use std::collections::BTreeSet;

use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// Filter selection: which regions and categories are ticked
// ---------------------------------------------------------------------------

/// The user's current multi-select state.
///
/// An empty set means *nothing* is selected, so the view is empty. It does
/// not mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl FilterSelection {
    /// Every distinct region and category of `table` selected.
    pub fn all(table: &Table) -> Self {
        FilterSelection {
            regions: table.regions().iter().cloned().collect(),
            categories: table.categories().iter().cloned().collect(),
        }
    }

    fn admits(&self, rec: &Record) -> bool {
        self.regions.contains(&rec.region) && self.categories.contains(&rec.category)
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Read-only subset of a [`Table`], in table order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    /// A view over the given records (used by tests and by callers that
    /// already hold a subset).
    pub fn from_records(records: Vec<&'a Record>) -> Self {
        FilteredView { records }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keep the records whose region AND category are both selected.
pub fn filter<'a>(table: &'a Table, selection: &FilterSelection) -> FilteredView<'a> {
    if selection.regions.is_empty() || selection.categories.is_empty() {
        return FilteredView::default();
    }

    FilteredView {
        records: table
            .records()
            .iter()
            .filter(|rec| selection.admits(rec))
            .collect(),
    }
}
