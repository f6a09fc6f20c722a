use std::collections::BTreeSet;

use super::model::{Dataset, LongRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which patients / measurements are selected
// ---------------------------------------------------------------------------

/// Active dashboard filters.
///
/// An empty set means "no filter" for that dimension (show everything); both
/// dimensions are ANDed when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub selected_patients: BTreeSet<String>,
    pub selected_measurements: BTreeSet<String>,
}

impl FilterSpec {
    /// Whether a single record passes both dimension predicates.
    pub fn matches(&self, rec: &LongRecord) -> bool {
        (self.selected_patients.is_empty() || self.selected_patients.contains(&rec.patient_id))
            && (self.selected_measurements.is_empty()
                || self.selected_measurements.contains(&rec.measurement_name))
    }

    /// True when neither dimension constrains the view.
    pub fn is_unfiltered(&self) -> bool {
        self.selected_patients.is_empty() && self.selected_measurements.is_empty()
    }
}

/// Return indices of records that pass the active filters.
///
/// Pure and read-only: the dataset is never mutated, so concurrent calls over
/// the same shared dataset are safe. The result preserves record order.
pub fn filtered_indices(dataset: &Dataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
