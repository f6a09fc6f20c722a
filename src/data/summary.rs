use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::NaiveDate;
use log::debug;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// LatestDate – per-patient "latest measurement date" marker
// ---------------------------------------------------------------------------

/// Latest observation date for one patient.
///
/// The structural case (the whole dataset has no date axis) must stay
/// distinguishable from "axis present but no record of this patient carries a
/// parseable date" — only the structural case renders as "N/A".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestDate {
    /// The dataset has no date column.
    Unavailable,
    /// The date axis exists but every date for this patient is null.
    Unknown,
    On(NaiveDate),
}

impl fmt::Display for LatestDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatestDate::Unavailable => write!(f, "N/A"),
            LatestDate::Unknown => write!(f, "unknown"),
            LatestDate::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

// ---------------------------------------------------------------------------
// PatientSummary – one card per patient in the current view
// ---------------------------------------------------------------------------

/// Derived per-patient card data. Ephemeral: recomputed on every filter
/// change, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSummary {
    pub patient_id: String,
    /// First value observed for this id within the current view.
    pub patient_name: String,
    /// First value observed for this id within the current view.
    pub dob: Option<String>,
    /// Distinct measurement names for this patient in the current view.
    pub measurement_names: BTreeSet<String>,
    pub latest_date: LatestDate,
}

/// Group the filtered view by patient, one summary per distinct id, ordered
/// by first occurrence in the view (stable grouping, not sorted by id).
///
/// Patients with zero records in the view are absent: no empty cards for
/// filtered-out patients.
pub fn summarize(dataset: &Dataset, visible: &[usize]) -> Vec<PatientSummary> {
    let mut slot_by_id: HashMap<&str, usize> = HashMap::new();
    let mut summaries: Vec<PatientSummary> = Vec::new();

    for &i in visible {
        let rec = &dataset.records[i];

        let slot = match slot_by_id.get(rec.patient_id.as_str()) {
            Some(&slot) => slot,
            None => {
                slot_by_id.insert(rec.patient_id.as_str(), summaries.len());
                summaries.push(PatientSummary {
                    patient_id: rec.patient_id.clone(),
                    patient_name: rec.patient_name.clone(),
                    dob: rec.dob.clone(),
                    measurement_names: BTreeSet::new(),
                    latest_date: if dataset.has_date_axis {
                        LatestDate::Unknown
                    } else {
                        LatestDate::Unavailable
                    },
                });
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[slot];
        // First occurrence wins; later conflicts only get a data-quality note.
        if rec.patient_name != summary.patient_name {
            debug!(
                "patient {}: conflicting names '{}' / '{}', keeping the first",
                rec.patient_id, summary.patient_name, rec.patient_name
            );
        }
        if rec.dob != summary.dob {
            debug!(
                "patient {}: conflicting dob {:?} / {:?}, keeping the first",
                rec.patient_id, summary.dob, rec.dob
            );
        }

        summary.measurement_names.insert(rec.measurement_name.clone());

        if let Some(date) = rec.date {
            summary.latest_date = match summary.latest_date {
                LatestDate::On(current) if current >= date => LatestDate::On(current),
                _ => LatestDate::On(date),
            };
        }
    }

    summaries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LongRecord;

    fn rec(id: &str, name: &str, measurement: &str, date: Option<&str>) -> LongRecord {
        LongRecord {
            patient_id: id.to_string(),
            patient_name: name.to_string(),
            dob: Some("1980-01-01".to_string()),
            date: date.map(|d| d.parse().expect("test date")),
            measurement_name: measurement.to_string(),
            measurement_value: Some(1.0),
        }
    }

    fn view(dataset: &Dataset) -> Vec<usize> {
        (0..dataset.len()).collect()
    }

    #[test]
    fn one_summary_per_patient_in_first_occurrence_order() {
        let ds = Dataset::from_records(
            vec![
                rec("P2", "Bob", "HR", None),
                rec("P1", "Alice", "HR", None),
                rec("P2", "Bob", "BP", None),
            ],
            false,
        );
        let summaries = summarize(&ds, &view(&ds));

        let ids: Vec<&str> = summaries.iter().map(|s| s.patient_id.as_str()).collect();
        assert_eq!(ids, ["P2", "P1"]);
    }

    #[test]
    fn first_encountered_name_wins_silently() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "Alice", "HR", None),
                rec("P1", "Alicia", "BP", None),
            ],
            false,
        );
        let summaries = summarize(&ds, &view(&ds));

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].patient_name, "Alice");
    }

    #[test]
    fn measurement_names_are_the_distinct_set_for_that_patient() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "Alice", "HR", None),
                rec("P1", "Alice", "BP", None),
                rec("P1", "Alice", "HR", None),
                rec("P2", "Bob", "Temp", None),
            ],
            false,
        );
        let summaries = summarize(&ds, &view(&ds));

        let names: Vec<&str> = summaries[0]
            .measurement_names
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(names, ["BP", "HR"]);
        assert!(!summaries[0].measurement_names.contains("Temp"));
    }

    #[test]
    fn latest_date_is_the_maximum_observed() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "Alice", "HR", Some("2025-06-08")),
                rec("P1", "Alice", "HR", Some("2025-06-01")),
                rec("P1", "Alice", "BP", None),
            ],
            true,
        );
        let summaries = summarize(&ds, &view(&ds));

        assert_eq!(
            summaries[0].latest_date,
            LatestDate::On(NaiveDate::from_ymd_opt(2025, 6, 8).expect("date"))
        );
    }

    #[test]
    fn no_date_axis_marks_latest_as_unavailable() {
        let ds = Dataset::from_records(vec![rec("P1", "Alice", "HR", None)], false);
        let summaries = summarize(&ds, &view(&ds));

        assert_eq!(summaries[0].latest_date, LatestDate::Unavailable);
        assert_eq!(summaries[0].latest_date.to_string(), "N/A");
    }

    #[test]
    fn all_null_dates_under_a_present_axis_are_unknown_not_unavailable() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "Alice", "HR", None),
                rec("P2", "Bob", "HR", Some("2025-06-01")),
            ],
            true,
        );
        let summaries = summarize(&ds, &view(&ds));

        assert_eq!(summaries[0].latest_date, LatestDate::Unknown);
        assert_eq!(
            summaries[1].latest_date,
            LatestDate::On(NaiveDate::from_ymd_opt(2025, 6, 1).expect("date"))
        );
    }

    #[test]
    fn filtered_out_patients_get_no_card() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "Alice", "HR", None),
                rec("P2", "Bob", "HR", None),
            ],
            false,
        );
        // View containing only P1's record.
        let summaries = summarize(&ds, &[0]);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].patient_id, "P1");
    }
}
