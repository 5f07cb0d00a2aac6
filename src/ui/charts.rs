use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Align2, Color32, FontId, Pos2, RichText, ScrollArea, Sense, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use kpi_dashboard::present::{BarChartSpec, KpiLabel, LineChartSpec, PieChartSpec};
use kpi_dashboard::state::AppState;

use crate::color::ColorMap;

const CHART_HEIGHT: f32 = 280.0;
const PIE_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Dashboard layout (central panel)
// ---------------------------------------------------------------------------

/// KPI row → two bars → full-width line → two pies.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        return;
    };
    let charts = &dashboard.charts;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(state.config.labels.kpi_heading);
            ui.add_space(8.0);
            kpi_row(ui, &charts.kpis);
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                bar_chart(&mut cols[0], "profit_by_category", &charts.profit_by_category);
                bar_chart(&mut cols[1], "profit_by_region", &charts.profit_by_region);
            });
            ui.separator();

            line_chart(ui, "profit_over_time", &charts.profit_over_time);
            ui.separator();

            ui.columns(2, |cols: &mut [Ui]| {
                pie_chart(&mut cols[0], &charts.sales_by_category);
                pie_chart(&mut cols[1], &charts.ship_modes);
            });
        });
}

fn kpi_row(ui: &mut Ui, kpis: &[KpiLabel]) {
    ui.columns(kpis.len().max(1), |cols: &mut [Ui]| {
        for (col, kpi) in cols.iter_mut().zip(kpis) {
            col.label(RichText::new(&kpi.title).size(18.0));
            col.label(RichText::new(&kpi.value).size(26.0).strong());
        }
    });
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, id: &str, spec: &BarChartSpec) {
    ui.strong(&spec.title);

    let colors = ColorMap::new(spec.bars.iter().map(|b| b.label.as_str()));
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.value)
                .name(&b.label)
                .width(0.7)
                .fill(colors.color_for(&b.label))
        })
        .collect();

    // Category names sit under integer x positions.
    let names: Vec<String> = spec.bars.iter().map(|b| b.label.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(spec.x_title.clone())
        .y_axis_label(spec.y_title.clone())
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

fn line_chart(ui: &mut Ui, id: &str, spec: &LineChartSpec) {
    ui.strong(&spec.title);
    ui.label(RichText::new(&spec.legend_title).weak());

    let colors = ColorMap::new(spec.series.iter().map(|s| s.label.as_str()));

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(spec.x_title.clone())
        .y_axis_label(spec.y_title.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in &spec.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                let line = Line::new(points)
                    .name(&series.label)
                    .color(colors.color_for(&series.label))
                    .width(2.0);
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Pie (donut) chart
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, spec: &PieChartSpec) {
    ui.strong(&spec.title);

    let colors = ColorMap::new(spec.slices.iter().map(|s| s.label.as_str()));
    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), PIE_HEIGHT), Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let outer = 0.45 * rect.width().min(rect.height());
    let inner = outer * spec.hole.clamp(0.0, 0.95);

    if spec.total() <= 0.0 {
        painter.text(
            center,
            Align2::CENTER_CENTER,
            &spec.empty_text,
            FontId::proportional(18.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    // Start at twelve o'clock.
    let mut start = -FRAC_PI_2;
    for (i, slice) in spec.slices.iter().enumerate() {
        let sweep = spec.share(i) as f32 * TAU;
        ring_segment(&painter, center, inner, outer, start, sweep, colors.color_for(&slice.label));
        start += sweep;
    }

    for (i, slice) in spec.slices.iter().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            let (swatch, p) = ui.allocate_painter(egui::vec2(12.0, 12.0), Sense::hover());
            p.rect_filled(swatch.rect, 2.0, colors.color_for(&slice.label));
            ui.label(format!("{}  {:.1}%", slice.label, spec.share(i) * 100.0));
        });
    }
}

/// Fill an annulus sector as a run of small convex quads (or triangles when
/// there is no hole).
fn ring_segment(
    painter: &egui::Painter,
    center: Pos2,
    inner: f32,
    outer: f32,
    start: f32,
    sweep: f32,
    fill: Color32,
) {
    const MAX_STEP: f32 = 0.05;
    let steps = (sweep / MAX_STEP).ceil().max(1.0) as usize;
    let step = sweep / steps as f32;
    let at = |r: f32, a: f32| center + r * egui::vec2(a.cos(), a.sin());

    for k in 0..steps {
        let a0 = start + step * k as f32;
        let a1 = a0 + step;
        let points = if inner > 0.0 {
            vec![at(outer, a0), at(outer, a1), at(inner, a1), at(inner, a0)]
        } else {
            vec![center, at(outer, a0), at(outer, a1)]
        };
        painter.add(egui::Shape::convex_polygon(points, fill, egui::Stroke::NONE));
    }
}
