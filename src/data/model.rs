use std::collections::BTreeSet;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// WideRecord – one source row, measurements still packed
// ---------------------------------------------------------------------------

/// A single row of the source table: one (patient, observation event) with
/// the measurement names and values still packed as delimited strings.
#[derive(Debug, Clone)]
pub struct WideRecord {
    pub patient_id: String,
    pub patient_name: String,
    /// Date of birth, kept as source text. Nothing downstream does date
    /// arithmetic on it.
    pub dob: Option<String>,
    /// Observation date. `None` when the source cell is empty or does not
    /// parse as a date.
    pub date: Option<NaiveDate>,
    /// Packed measurement names, e.g. `"HR, BP"`.
    pub measurement_names: String,
    /// Packed measurement values, positionally paired with the names.
    pub measurement_values: String,
}

// ---------------------------------------------------------------------------
// LongRecord – one row per (event, single measurement)
// ---------------------------------------------------------------------------

/// The normalized shape: one record per (patient, observation event, single
/// measurement). Identity fields are carried over verbatim from the wide row.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub patient_id: String,
    pub patient_name: String,
    pub dob: Option<String>,
    pub date: Option<NaiveDate>,
    pub measurement_name: String,
    /// `None` when the source token is not numeric. The measurement is still
    /// "present" for filtering and grouping, it just has no magnitude.
    pub measurement_value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete normalized collection
// ---------------------------------------------------------------------------

/// The full normalized dataset with pre-computed filter indices.
/// Built once after load, never mutated afterwards, so it can be shared
/// freely between the filter, summarizer, and projector.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All long-form records.
    pub records: Vec<LongRecord>,
    /// Whether the source table carried a `date` column at all. Structural:
    /// decided once at load time, never per record or per filter.
    pub has_date_axis: bool,
    /// Sorted set of distinct patient ids (filter widget options).
    pub patient_ids: BTreeSet<String>,
    /// Sorted set of distinct measurement names (filter widget options).
    pub measurement_names: BTreeSet<String>,
}

impl Dataset {
    /// Build the unique-value indices from normalized records.
    pub fn from_records(records: Vec<LongRecord>, has_date_axis: bool) -> Self {
        let mut patient_ids = BTreeSet::new();
        let mut measurement_names = BTreeSet::new();

        for rec in &records {
            patient_ids.insert(rec.patient_id.clone());
            measurement_names.insert(rec.measurement_name.clone());
        }
        Dataset {
            records,
            has_date_axis,
            patient_ids,
            measurement_names,
        }
    }

    /// Number of long-form records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
