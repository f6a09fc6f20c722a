use log::warn;

use super::model::{LongRecord, WideRecord};

// ---------------------------------------------------------------------------
// Wide → long explosion
// ---------------------------------------------------------------------------

/// Separator between packed measurement names/values in the source table.
pub const MEASUREMENT_DELIMITER: &str = ", ";

/// Explode packed wide rows into one record per (event, measurement).
///
/// `measurement_names` and `measurement_values` are split on
/// [`MEASUREMENT_DELIMITER`] and paired positionally: a wide row with N names
/// and N values yields exactly N long records sharing its identity fields.
/// A row whose two lists disagree in length has no well-defined pairing and
/// is dropped with a warning; the rest of the load continues.
///
/// Runs exactly once, eagerly, after load. Filter interactions never re-run
/// the explosion.
pub fn normalize(wide: Vec<WideRecord>) -> Vec<LongRecord> {
    let mut records = Vec::with_capacity(wide.len());

    for row in wide {
        let names: Vec<&str> = row
            .measurement_names
            .split(MEASUREMENT_DELIMITER)
            .map(str::trim)
            .collect();
        let values: Vec<&str> = row
            .measurement_values
            .split(MEASUREMENT_DELIMITER)
            .map(str::trim)
            .collect();

        if names.len() != values.len() {
            warn!(
                "patient {}: {} measurement names but {} values, dropping row",
                row.patient_id,
                names.len(),
                values.len()
            );
            continue;
        }

        for (name, value) in names.iter().zip(values.iter()) {
            records.push(LongRecord {
                patient_id: row.patient_id.clone(),
                patient_name: row.patient_name.clone(),
                dob: row.dob.clone(),
                date: row.date,
                measurement_name: (*name).to_string(),
                measurement_value: coerce_numeric(value),
            });
        }
    }

    records
}

/// Numeric coercion of a single value token. Tokens like `"abnormal"` yield
/// `None`; the surrounding record is kept either way.
fn coerce_numeric(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn wide(id: &str, names: &str, values: &str) -> WideRecord {
        WideRecord {
            patient_id: id.to_string(),
            patient_name: format!("Name of {id}"),
            dob: Some("1980-01-01".to_string()),
            date: None,
            measurement_names: names.to_string(),
            measurement_values: values.to_string(),
        }
    }

    #[test]
    fn explodes_packed_pairs_positionally() {
        let records = normalize(vec![wide("P1", "HR, BP", "72, 120")]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].measurement_name, "HR");
        assert_eq!(records[0].measurement_value, Some(72.0));
        assert_eq!(records[1].measurement_name, "BP");
        assert_eq!(records[1].measurement_value, Some(120.0));
    }

    #[test]
    fn long_records_share_identity_fields() {
        let records = normalize(vec![wide("P1", "HR, BP, Temp", "72, 120, 36.6")]);

        assert_eq!(records.len(), 3);
        for rec in &records {
            assert_eq!(rec.patient_id, "P1");
            assert_eq!(rec.patient_name, "Name of P1");
            assert_eq!(rec.dob.as_deref(), Some("1980-01-01"));
        }
    }

    #[test]
    fn non_numeric_value_becomes_null_but_record_survives() {
        let records = normalize(vec![wide("P1", "HR, ECG", "72, abnormal")]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].measurement_name, "ECG");
        assert_eq!(records[1].measurement_value, None);
    }

    #[test]
    fn mismatched_lengths_drop_only_that_row() {
        let records = normalize(vec![
            wide("P1", "HR, BP, Temp", "72, 120"),
            wide("P2", "HR", "80"),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].patient_id, "P2");
    }

    #[test]
    fn single_measurement_row_yields_one_record() {
        let records = normalize(vec![wide("P1", "HR", "72")]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].measurement_name, "HR");
    }
}
