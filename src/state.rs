use crate::color::ColorMap;
use crate::data::filter::{FilterSpec, filtered_indices};
use crate::data::model::Dataset;
use crate::data::series::{AxisMode, Series, project};
use crate::data::summary::{PatientSummary, summarize};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Rows per table page.
pub const PAGE_SIZE: usize = 10;

/// The full UI state, independent of rendering.
///
/// The dataset is loaded once and then only read; every filter interaction
/// runs one synchronous filter → summarize → project pass and replaces the
/// cached view below.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Active filter selections.
    pub filter: FilterSpec,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Per-patient cards for the current view (cached).
    pub summaries: Vec<PatientSummary>,

    /// Chart series for the current view (cached).
    pub axis_mode: AxisMode,
    pub series: Vec<Series>,

    /// Measurement colour assignments.
    pub color_map: ColorMap,

    /// Current table page (0-based).
    pub table_page: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filter: FilterSpec::default(),
            visible_indices: Vec::new(),
            summaries: Vec::new(),
            axis_mode: AxisMode::Categorical,
            series: Vec::new(),
            color_map: ColorMap::default(),
            table_page: 0,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: reset filters, rebuild colours and the
    /// derived view.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filter = FilterSpec::default();
        self.color_map = ColorMap::new(&dataset.measurement_names);
        self.dataset = Some(dataset);
        self.table_page = 0;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the derived view after a filter change: visible rows,
    /// patient cards, and chart series. This is the whole reactive update —
    /// the data layer never learns about UI event wiring.
    pub fn refilter(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(dataset, &self.filter);
        self.summaries = summarize(dataset, &self.visible_indices);
        let (axis_mode, series) = project(dataset, &self.visible_indices);
        self.axis_mode = axis_mode;
        self.series = series;

        // Keep the table page in range for the new view.
        let pages = self.page_count();
        if self.table_page >= pages {
            self.table_page = pages - 1;
        }
    }

    /// Number of table pages for the current view (at least one).
    pub fn page_count(&self) -> usize {
        self.visible_indices.len().div_ceil(PAGE_SIZE).max(1)
    }

    /// The slice of visible indices shown on the current table page.
    pub fn page_rows(&self) -> &[usize] {
        let start = (self.table_page * PAGE_SIZE).min(self.visible_indices.len());
        let end = (start + PAGE_SIZE).min(self.visible_indices.len());
        &self.visible_indices[start..end]
    }

    /// Toggle one patient id in the filter.
    pub fn toggle_patient(&mut self, patient_id: &str) {
        if !self.filter.selected_patients.remove(patient_id) {
            self.filter.selected_patients.insert(patient_id.to_string());
        }
        self.refilter();
    }

    /// Toggle one measurement name in the filter.
    pub fn toggle_measurement(&mut self, measurement: &str) {
        if !self.filter.selected_measurements.remove(measurement) {
            self.filter
                .selected_measurements
                .insert(measurement.to_string());
        }
        self.refilter();
    }

    /// Clear the patient selection (empty set = show all patients).
    pub fn clear_patient_filter(&mut self) {
        self.filter.selected_patients.clear();
        self.refilter();
    }

    /// Clear the measurement selection (empty set = show all measurements).
    pub fn clear_measurement_filter(&mut self) {
        self.filter.selected_measurements.clear();
        self.refilter();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
