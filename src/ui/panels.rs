use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use kpi_dashboard::state::{AppState, Dimension};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.config.labels.sidebar_header);
    ui.separator();

    let sections = [
        (Dimension::Region, state.config.labels.region_filter),
        (Dimension::Category, state.config.labels.category_filter),
    ];

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (dim, title) in sections {
                multiselect(ui, state, dim, title);
                ui.separator();
            }
        });
}

/// One multi-select: All / None buttons plus a checkbox per distinct value.
fn multiselect(ui: &mut Ui, state: &mut AppState, dim: Dimension, title: &str) {
    let n_selected = state.selected(dim).len();
    let n_total = state.options(dim).len();
    let header_text = format!("{title}  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dim);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(dim);
                }
            });

            // Collect first: toggling re-runs the pipeline and needs `&mut state`.
            let mut toggled: Option<String> = None;
            for value in state.options(dim) {
                let mut checked = state.selected(dim).contains(value);
                if ui.checkbox(&mut checked, value.as_str()).changed() {
                    toggled = Some(value.clone());
                }
            }
            if let Some(value) = toggled {
                state.toggle(dim, &value);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the status bar above the dashboard.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(state.config.window_title);
        ui.separator();

        if let (Some(table), Some(dashboard)) = (&state.table, &state.dashboard) {
            ui.label(format!(
                "{} records loaded, {} visible",
                table.len(),
                dashboard.visible_records
            ));
        }
    });
}

// ---------------------------------------------------------------------------
// Load failure
// ---------------------------------------------------------------------------

/// Full-window message shown when the dataset could not be loaded.
pub fn load_error(ui: &mut Ui, msg: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(msg).color(Color32::RED).heading());
    });
}
