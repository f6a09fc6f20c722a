use std::path::Path;

use anyhow::{Context, Result};

use crate::data::model::{Dataset, LongRecord};

// ---------------------------------------------------------------------------
// Table column order – shared by the table widget, CSV export, and PDF report
// ---------------------------------------------------------------------------

const COLUMNS_WITH_DATE: [&str; 6] = [
    "patient_id",
    "patient_name",
    "dob",
    "date",
    "measurement_name",
    "measurement_value",
];

const COLUMNS_WITHOUT_DATE: [&str; 5] = [
    "patient_id",
    "patient_name",
    "dob",
    "measurement_name",
    "measurement_value",
];

/// Column order of the table view. Datasets without a date axis have no date
/// column anywhere, including exports.
pub fn table_columns(has_date_axis: bool) -> &'static [&'static str] {
    if has_date_axis {
        &COLUMNS_WITH_DATE
    } else {
        &COLUMNS_WITHOUT_DATE
    }
}

/// Render one record as ordered (column, value) pairs in [`table_columns`]
/// order. This is the row shape the report generator consumes.
pub fn record_fields(rec: &LongRecord, has_date_axis: bool) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("patient_id", rec.patient_id.clone()),
        ("patient_name", rec.patient_name.clone()),
        ("dob", rec.dob.clone().unwrap_or_default()),
    ];
    if has_date_axis {
        fields.push((
            "date",
            rec.date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ));
    }
    fields.push(("measurement_name", rec.measurement_name.clone()));
    fields.push((
        "measurement_value",
        rec.measurement_value
            .map(|v| v.to_string())
            .unwrap_or_default(),
    ));
    fields
}

// ---------------------------------------------------------------------------
// CSV export of the current view
// ---------------------------------------------------------------------------

/// Write the currently visible rows to a CSV file in table column order.
/// One-shot side effect; never touches dashboard state.
pub fn write_view_csv(path: &Path, dataset: &Dataset, visible: &[usize]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer
        .write_record(table_columns(dataset.has_date_axis))
        .context("writing CSV header")?;

    for &i in visible {
        let fields = record_fields(&dataset.records[i], dataset.has_date_axis);
        writer
            .write_record(fields.iter().map(|(_, value)| value.as_str()))
            .with_context(|| format!("writing CSV row {i}"))?;
    }

    writer.flush().context("flushing CSV export")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
