mod app;
mod color;
mod ui;

use app::KpiDashboardApp;
use eframe::egui;
use kpi_dashboard::config::DashboardConfig;
use kpi_dashboard::data::loader;
use kpi_dashboard::state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::default();

    // The table is read exactly once; filter changes only re-run the pipeline.
    let loaded = loader::load(&config.data_path);
    let state = AppState::from_load(config.clone(), loaded);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title)
            .with_inner_size(config.inner_size)
            .with_min_inner_size(config.min_inner_size),
        ..Default::default()
    };

    eframe::run_native(
        config.window_title,
        options,
        Box::new(|_cc| Ok(Box::new(KpiDashboardApp { state }))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
