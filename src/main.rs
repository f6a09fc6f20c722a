use std::path::PathBuf;

use anyhow::Context;
use eframe::egui;

use medidash::app::MediDashApp;
use medidash::data::loader;

/// Default dataset location: the summary produced by the upstream medical
/// data pipeline.
const DEFAULT_DATASET: &str = "medical_data_summary.csv";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_DATASET.to_string()),
    );
    let dataset = loader::load_file(&path)
        .with_context(|| format!("loading dataset {}", path.display()))?;
    log::info!(
        "Loaded {} records for {} patients from {}",
        dataset.len(),
        dataset.patient_ids.len(),
        path.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "MediDash – Medical Data Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(MediDashApp::with_dataset(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
