use chrono::NaiveDate;
use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::data::series::{AxisMode, PointX, Series};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trend chart (central panel)
// ---------------------------------------------------------------------------

/// Render the trend chart for the current view. Temporal datasets get one
/// line with markers per (measurement, patient) series; dateless datasets get
/// measurement point groups over a categorical patient axis.
pub fn trend_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a measurement summary to begin  (File → Open…)");
        });
        return;
    }

    match state.axis_mode {
        AxisMode::Temporal => temporal_plot(ui, state),
        AxisMode::Categorical => categorical_plot(ui, state),
    }
}

fn day_number(date: NaiveDate) -> f64 {
    use chrono::Datelike;
    f64::from(date.num_days_from_ce())
}

fn format_day(value: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn temporal_plot(ui: &mut Ui, state: &AppState) {
    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Measurement value")
        .x_axis_formatter(|mark, _range| format_day(mark.value))
        .label_formatter(|name, value| {
            if name.is_empty() {
                format!("{}\n{:.2}", format_day(value.x), value.y)
            } else {
                format!("{name}\n{}\n{:.2}", format_day(value.x), value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &state.series {
                let color = state.color_map.color_for(&series.measurement_name);
                let name = series_label(series);

                // Null magnitudes have nothing to draw.
                let coords: Vec<[f64; 2]> = series
                    .points
                    .iter()
                    .filter_map(|p| match (&p.x, p.y) {
                        (PointX::Date(date), Some(y)) => Some([day_number(*date), y]),
                        _ => None,
                    })
                    .collect();
                if coords.is_empty() {
                    continue;
                }

                let line = Line::new(PlotPoints::from(coords.clone()))
                    .name(&name)
                    .color(color)
                    .width(1.5);
                plot_ui.line(line);

                let markers = Points::new(PlotPoints::from(coords))
                    .name(&name)
                    .color(color)
                    .radius(3.0);
                plot_ui.points(markers);
            }
        });
}

fn categorical_plot(ui: &mut Ui, state: &AppState) {
    let labels = categorical_labels(&state.series);
    let axis_labels = labels.clone();

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Patient")
        .y_axis_label("Measurement value")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            axis_labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &state.series {
                let color = state.color_map.color_for(&series.measurement_name);

                let coords: Vec<[f64; 2]> = series
                    .points
                    .iter()
                    .filter_map(|p| match (&p.x, p.y) {
                        (PointX::Label(label), Some(y)) => labels
                            .iter()
                            .position(|l| l == label)
                            .map(|i| [i as f64, y]),
                        _ => None,
                    })
                    .collect();
                if coords.is_empty() {
                    continue;
                }

                let markers = Points::new(PlotPoints::from(coords))
                    .name(&series.measurement_name)
                    .color(color)
                    .radius(4.0);
                plot_ui.points(markers);
            }
        });
}

/// Legend entry: measurement plus patient in temporal mode, measurement alone
/// in categorical mode.
fn series_label(series: &Series) -> String {
    match &series.patient_id {
        Some(patient_id) => format!("{} – {}", series.measurement_name, patient_id),
        None => series.measurement_name.clone(),
    }
}

/// Categorical x positions: patient names in first-seen order across series.
fn categorical_labels(series: &[Series]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for s in series {
        for point in &s.points {
            if let PointX::Label(label) = &point.x {
                if !labels.iter().any(|l| l == label) {
                    labels.push(label.clone());
                }
            }
        }
    }
    labels
}
