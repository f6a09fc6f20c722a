use eframe::egui;

use crate::data::model::Dataset;
use crate::state::AppState;
use crate::ui::{cards, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MediDashApp {
    pub state: AppState,
}

impl Default for MediDashApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl MediDashApp {
    /// Start with the dataset loaded at process start.
    pub fn with_dataset(dataset: Dataset) -> Self {
        let mut state = AppState::default();
        state.set_dataset(dataset);
        Self { state }
    }
}

impl eframe::App for MediDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: paginated table ----
        egui::TopBottomPanel::bottom("table_panel")
            .default_height(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                table::table_panel(ui, &mut self.state);
            });

        // ---- Central panel: summary cards + trend chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            cards::summary_cards(ui, &self.state);
            plot::trend_plot(ui, &self.state);
        });
    }
}
