use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Chart-ready series
// ---------------------------------------------------------------------------

/// How the x axis of the trend chart is laid out. A structural property of
/// the whole dataset (date column present or not), decided once at load time
/// and never a function of the active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMode {
    /// x = observation date; one line per (measurement, patient).
    Temporal,
    /// No date column: x = patient; one point group per measurement.
    Categorical,
}

/// One x position of a series point.
#[derive(Debug, Clone, PartialEq)]
pub enum PointX {
    Date(NaiveDate),
    /// Patient name used as a categorical label.
    Label(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub x: PointX,
    /// `None` when the measurement has no numeric magnitude. Such points stay
    /// in the series (the measurement is present) but are skipped when drawn.
    pub y: Option<f64>,
    /// Shown next to the value on hover.
    pub patient_name: String,
}

/// An ordered run of points for one legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub measurement_name: String,
    /// `None` in categorical mode, where series are keyed by measurement only.
    pub patient_id: Option<String>,
    pub points: Vec<SeriesPoint>,
}

/// Project the filtered view into chart series.
///
/// Temporal mode partitions by (measurement, patient) with points in
/// ascending date order; records without a date have no position on the time
/// axis and are omitted. Categorical mode partitions by measurement only,
/// with the patient name as the x label.
pub fn project(dataset: &Dataset, visible: &[usize]) -> (AxisMode, Vec<Series>) {
    if dataset.has_date_axis {
        (AxisMode::Temporal, project_temporal(dataset, visible))
    } else {
        (AxisMode::Categorical, project_categorical(dataset, visible))
    }
}

fn project_temporal(dataset: &Dataset, visible: &[usize]) -> Vec<Series> {
    type Key = (String, String);
    let mut groups: BTreeMap<Key, Vec<(NaiveDate, Option<f64>, String)>> = BTreeMap::new();

    for &i in visible {
        let rec = &dataset.records[i];
        let Some(date) = rec.date else {
            continue;
        };
        groups
            .entry((rec.measurement_name.clone(), rec.patient_id.clone()))
            .or_default()
            .push((date, rec.measurement_value, rec.patient_name.clone()));
    }

    groups
        .into_iter()
        .map(|((measurement_name, patient_id), mut raw)| {
            raw.sort_by_key(|(date, _, _)| *date);
            Series {
                measurement_name,
                patient_id: Some(patient_id),
                points: raw
                    .into_iter()
                    .map(|(date, y, patient_name)| SeriesPoint {
                        x: PointX::Date(date),
                        y,
                        patient_name,
                    })
                    .collect(),
            }
        })
        .collect()
}

fn project_categorical(dataset: &Dataset, visible: &[usize]) -> Vec<Series> {
    let mut groups: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();

    for &i in visible {
        let rec = &dataset.records[i];
        groups
            .entry(rec.measurement_name.clone())
            .or_default()
            .push(SeriesPoint {
                x: PointX::Label(rec.patient_name.clone()),
                y: rec.measurement_value,
                patient_name: rec.patient_name.clone(),
            });
    }

    groups
        .into_iter()
        .map(|(measurement_name, points)| Series {
            measurement_name,
            patient_id: None,
            points,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LongRecord;

    fn rec(id: &str, measurement: &str, date: Option<&str>, value: Option<f64>) -> LongRecord {
        LongRecord {
            patient_id: id.to_string(),
            patient_name: format!("Name of {id}"),
            dob: None,
            date: date.map(|d| d.parse().expect("test date")),
            measurement_name: measurement.to_string(),
            measurement_value: value,
        }
    }

    fn view(dataset: &Dataset) -> Vec<usize> {
        (0..dataset.len()).collect()
    }

    #[test]
    fn mode_follows_the_date_axis_not_the_filter() {
        let with_axis = Dataset::from_records(vec![rec("P1", "HR", None, Some(1.0))], true);
        let without_axis = Dataset::from_records(vec![rec("P1", "HR", None, Some(1.0))], false);

        assert_eq!(project(&with_axis, &view(&with_axis)).0, AxisMode::Temporal);
        assert_eq!(project(&with_axis, &[]).0, AxisMode::Temporal);
        assert_eq!(
            project(&without_axis, &view(&without_axis)).0,
            AxisMode::Categorical
        );
    }

    #[test]
    fn temporal_series_are_keyed_by_measurement_and_patient() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "HR", Some("2025-06-01"), Some(72.0)),
                rec("P2", "HR", Some("2025-06-01"), Some(80.0)),
                rec("P1", "BP", Some("2025-06-01"), Some(120.0)),
            ],
            true,
        );
        let (_, series) = project(&ds, &view(&ds));

        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|s| s.patient_id.is_some()));
    }

    #[test]
    fn temporal_points_are_date_ordered() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "HR", Some("2025-06-08"), Some(75.0)),
                rec("P1", "HR", Some("2025-06-01"), Some(72.0)),
                rec("P1", "HR", Some("2025-06-15"), Some(71.0)),
            ],
            true,
        );
        let (_, series) = project(&ds, &view(&ds));

        assert_eq!(series.len(), 1);
        let ys: Vec<Option<f64>> = series[0].points.iter().map(|p| p.y).collect();
        assert_eq!(ys, [Some(72.0), Some(75.0), Some(71.0)]);
    }

    #[test]
    fn null_dates_are_omitted_from_temporal_series() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "HR", Some("2025-06-01"), Some(72.0)),
                rec("P1", "HR", None, Some(99.0)),
            ],
            true,
        );
        let (_, series) = project(&ds, &view(&ds));

        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[0].points[0].y, Some(72.0));
    }

    #[test]
    fn categorical_series_are_keyed_by_measurement_only() {
        let ds = Dataset::from_records(
            vec![
                rec("P1", "HR", None, Some(72.0)),
                rec("P2", "HR", None, Some(80.0)),
                rec("P2", "Temp", None, Some(36.6)),
            ],
            false,
        );
        let (_, series) = project(&ds, &view(&ds));

        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|s| s.patient_id.is_none()));

        let hr = series.iter().find(|s| s.measurement_name == "HR").expect("HR");
        assert_eq!(hr.points.len(), 2);
        assert_eq!(hr.points[0].x, PointX::Label("Name of P1".to_string()));
    }

    #[test]
    fn null_values_stay_in_the_series_without_a_magnitude() {
        let ds = Dataset::from_records(
            vec![rec("P1", "ECG", Some("2025-06-01"), None)],
            true,
        );
        let (_, series) = project(&ds, &view(&ds));

        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[0].points[0].y, None);
    }
}
