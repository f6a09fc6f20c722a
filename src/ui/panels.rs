use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one checkbox group per filter dimension.
/// No checked boxes in a group means "show all" for that dimension.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the option and selection sets so we can mutate state inside the
    // loops.
    let patient_ids = dataset.patient_ids.clone();
    let measurement_names = dataset.measurement_names.clone();
    let selected_patients = state.filter.selected_patients.clone();
    let selected_measurements = state.filter.selected_measurements.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            filter_group(
                ui,
                "Patients",
                &patient_ids,
                &selected_patients,
                state,
                FilterDimension::Patients,
            );
            ui.separator();
            filter_group(
                ui,
                "Measurements",
                &measurement_names,
                &selected_measurements,
                state,
                FilterDimension::Measurements,
            );
        });
}

#[derive(Clone, Copy)]
enum FilterDimension {
    Patients,
    Measurements,
}

fn filter_group(
    ui: &mut Ui,
    title: &str,
    options: &BTreeSet<String>,
    selected: &BTreeSet<String>,
    state: &mut AppState,
    dimension: FilterDimension,
) {
    // Header shows selected/total; an empty selection means "all".
    let header_text = if selected.is_empty() {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({}/{})", selected.len(), options.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Show all").clicked() {
                match dimension {
                    FilterDimension::Patients => state.clear_patient_filter(),
                    FilterDimension::Measurements => state.clear_measurement_filter(),
                }
            }

            for option in options {
                let mut checked = selected.contains(option);

                // Measurement labels get their chart colour as a swatch.
                let text = match dimension {
                    FilterDimension::Measurements => {
                        RichText::new(option).color(state.color_map.color_for(option))
                    }
                    FilterDimension::Patients => RichText::new(option),
                };

                if ui.checkbox(&mut checked, text).changed() {
                    match dimension {
                        FilterDimension::Patients => state.toggle_patient(option),
                        FilterDimension::Measurements => state.toggle_measurement(option),
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Export view as CSV…").clicked() {
                export_csv_dialog(state);
                ui.close_menu();
            }
            if ui.button("Download PDF report…").clicked() {
                export_pdf_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open measurement summary")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records for {} patients",
                    dataset.len(),
                    dataset.patient_ids.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn export_csv_dialog(state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export filtered view")
        .set_file_name("filtered_view.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match crate::export::write_view_csv(&path, dataset, &state.visible_indices) {
            Ok(()) => {
                state.status_message = Some(format!(
                    "Exported {} rows to {}",
                    state.visible_indices.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("CSV export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}

fn export_pdf_dialog(state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Download PDF report")
        .set_file_name("medical_report.pdf")
        .add_filter("PDF", &["pdf"])
        .save_file();

    if let Some(path) = file {
        match crate::report::write_report_pdf(&path, dataset, &state.visible_indices) {
            Ok(()) => {
                state.status_message = Some(format!("Report written to {}", path.display()));
            }
            Err(e) => {
                log::error!("PDF report failed: {e:#}");
                state.status_message = Some(format!("Report failed: {e:#}"));
            }
        }
    }
}
