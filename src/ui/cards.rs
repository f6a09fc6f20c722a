use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Patient summary cards
// ---------------------------------------------------------------------------

/// Render one card per patient in the current view. Filtered-out patients
/// have no card at all.
pub fn summary_cards(ui: &mut Ui, state: &AppState) {
    if state.summaries.is_empty() {
        return;
    }

    ScrollArea::horizontal()
        .id_salt("summary_cards")
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                for summary in &state.summaries {
                    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                        ui.vertical(|ui: &mut Ui| {
                            ui.strong(format!("Patient: {}", summary.patient_id));
                            ui.label(format!("Name: {}", summary.patient_name));
                            ui.label(format!(
                                "DOB: {}",
                                summary.dob.as_deref().unwrap_or("unknown")
                            ));
                            let measurements: Vec<&str> = summary
                                .measurement_names
                                .iter()
                                .map(String::as_str)
                                .collect();
                            ui.label(format!("Measurements: {}", measurements.join(", ")));
                            ui.label(format!("Latest date: {}", summary.latest_date));
                        });
                    });
                }
            });
        });
    ui.separator();
}
