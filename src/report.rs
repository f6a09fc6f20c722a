use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::data::model::Dataset;
use crate::export::{record_fields, table_columns};

// ---------------------------------------------------------------------------
// PDF report over the current table view
// ---------------------------------------------------------------------------

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP_Y: Mm = Mm(280.0);
const BOTTOM_Y: Mm = Mm(15.0);

/// Build the "Patient Medical Report" PDF from the rows currently shown in
/// the table, in table column order. Returns the PDF bytes.
///
/// Triggered only by explicit user action; a failure here never affects
/// dashboard state.
pub fn generate_report_pdf(dataset: &Dataset, visible: &[usize]) -> Result<Vec<u8>> {
    let (doc, page1, layer1) =
        PdfDocument::new("Patient Medical Report", PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let mut layer = doc.get_page(page1).get_layer(layer1);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("PDF font error: {e}"))?;
    let courier = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| anyhow!("PDF font error: {e}"))?;

    let mut y = TOP_Y;
    layer.use_text("Patient Medical Report", 14.0, Mm(20.0), y, &bold);
    y -= Mm(10.0);

    let columns = table_columns(dataset.has_date_axis);
    layer.use_text(columns.join(" | "), 8.0, Mm(20.0), y, &bold);
    y -= Mm(5.0);

    for &i in visible {
        if y < BOTTOM_Y {
            let (page, first_layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            layer = doc.get_page(page).get_layer(first_layer);
            y = TOP_Y;
        }

        let fields = record_fields(&dataset.records[i], dataset.has_date_axis);
        let line = fields
            .iter()
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        layer.use_text(line, 8.0, Mm(20.0), y, &courier);
        y -= Mm(4.0);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| anyhow!("PDF save error: {e}"))?;
    buf.into_inner()
        .map_err(|e| anyhow!("PDF buffer error: {e}"))
}

/// Generate the report for the current view and write it to `path`.
pub fn write_report_pdf(path: &Path, dataset: &Dataset, visible: &[usize]) -> Result<()> {
    let bytes = generate_report_pdf(dataset, visible)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LongRecord;

    fn rec(id: &str, measurement: &str, value: Option<f64>) -> LongRecord {
        LongRecord {
            patient_id: id.to_string(),
            patient_name: format!("Name of {id}"),
            dob: Some("1980-01-01".to_string()),
            date: "2025-06-01".parse().ok(),
            measurement_name: measurement.to_string(),
            measurement_value: value,
        }
    }

    #[test]
    fn report_bytes_form_a_pdf() {
        let dataset = Dataset::from_records(
            vec![rec("P1", "HR", Some(72.0)), rec("P2", "BP", Some(120.0))],
            true,
        );
        let bytes = generate_report_pdf(&dataset, &[0, 1]).expect("pdf");

        assert!(bytes.starts_with(b"%PDF"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn empty_view_still_produces_a_document() {
        let dataset = Dataset::from_records(vec![rec("P1", "HR", Some(72.0))], true);
        let bytes = generate_report_pdf(&dataset, &[]).expect("pdf");

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_views_paginate_without_error() {
        let records: Vec<LongRecord> = (0..300).map(|i| rec(&format!("P{i}"), "HR", Some(70.0))).collect();
        let visible: Vec<usize> = (0..records.len()).collect();
        let dataset = Dataset::from_records(records, true);

        let bytes = generate_report_pdf(&dataset, &visible).expect("pdf");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn report_file_is_written() {
        let dataset = Dataset::from_records(vec![rec("P1", "HR", Some(72.0))], true);
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("medical_report.pdf");

        write_report_pdf(&path, &dataset, &[0]).expect("write");
        assert!(path.is_file());
    }
}
