use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use log::warn;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, WideRecord};
use super::normalize::normalize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Load-time failures callers are expected to match on.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The backing file does not exist. Fatal: there is no fallback dataset.
    #[error("dataset not found: {}", path.display())]
    SourceNotFound { path: PathBuf },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Columns every source table must carry. `date` is optional; its presence
/// decides the dataset's axis mode.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "patient_id",
    "patient_name",
    "dob",
    "measurement_name",
    "measurement_value",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file, then normalize it eagerly. Dispatch by
/// extension.
///
/// Supported formats:
/// * `.csv`  – header row with the summary-table columns
/// * `.json` – records-oriented array of objects (`df.to_json(orient='records')`)
pub fn load_file(path: &Path) -> Result<Dataset> {
    if !path.is_file() {
        return Err(LoadError::SourceNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (wide, has_date_axis) = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    Ok(Dataset::from_records(normalize(wide), has_date_axis))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. `measurement_name` and
/// `measurement_value` cells carry `", "`-packed lists:
///   `"HR, BP"`, `"72, 120"`
fn load_csv(path: &Path) -> Result<(Vec<WideRecord>, bool)> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };

    let id_idx = column("patient_id")?;
    let name_idx = column("patient_name")?;
    let dob_idx = column("dob")?;
    let mname_idx = column("measurement_name")?;
    let mvalue_idx = column("measurement_value")?;
    // Optional: its absence switches the whole dataset to categorical mode.
    let date_idx = headers.iter().position(|h| h == "date");

    let mut wide = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let date = date_idx.and_then(|idx| {
            let raw = cell(idx);
            let parsed = parse_date(raw);
            if parsed.is_none() && !raw.is_empty() {
                warn!("CSV row {row_no}: unparsable date '{raw}', keeping record with null date");
            }
            parsed
        });

        let dob = cell(dob_idx);
        wide.push(WideRecord {
            patient_id: cell(id_idx).to_string(),
            patient_name: cell(name_idx).to_string(),
            dob: (!dob.is_empty()).then(|| dob.to_string()),
            date,
            measurement_names: cell(mname_idx).to_string(),
            measurement_values: cell(mvalue_idx).to_string(),
        });
    }

    Ok((wide, date_idx.is_some()))
}

/// Lenient date parsing. Anything that fails every known format becomes a
/// null date rather than a load failure.
fn parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "patient_id": "P1",
///     "patient_name": "Alice",
///     "dob": "1985-02-14",
///     "date": "2025-06-01",
///     "measurement_name": "HR, BP",
///     "measurement_value": "72, 120"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<(Vec<WideRecord>, bool)> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    // Structural date axis: any record carries the key.
    let has_date_axis = rows
        .iter()
        .filter_map(|r| r.as_object())
        .any(|obj| obj.contains_key("date"));

    let mut wide = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        if !obj.contains_key("patient_id") {
            bail!("Row {i}: missing 'patient_id'");
        }

        let field = |name: &str| obj.get(name).map(json_to_text).unwrap_or_default();

        let date = obj.get("date").and_then(|v| {
            let raw = json_to_text(v);
            let parsed = parse_date(&raw);
            if parsed.is_none() && !raw.is_empty() {
                warn!("JSON row {i}: unparsable date '{raw}', keeping record with null date");
            }
            parsed
        });

        let dob = field("dob");
        wide.push(WideRecord {
            patient_id: field("patient_id"),
            patient_name: field("patient_name"),
            dob: (!dob.is_empty()).then_some(dob),
            date,
            measurement_names: field("measurement_name"),
            measurement_values: field("measurement_value"),
        });
    }

    Ok((wide, has_date_axis))
}

/// Coerce a JSON scalar to the textual form the normalizer splits on.
fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
