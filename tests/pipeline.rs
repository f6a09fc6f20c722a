use std::io::Write;
use std::path::PathBuf;

use medidash::data::filter::{FilterSpec, filtered_indices};
use medidash::data::loader::load_file;
use medidash::data::series::{AxisMode, project};
use medidash::data::summary::{LatestDate, summarize};
use medidash::export::write_view_csv;
use medidash::report::generate_report_pdf;

fn write_temp(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    (dir, path)
}

const SUMMARY_CSV: &str = "\
patient_id,patient_name,dob,date,measurement_name,measurement_value
P1,Alice,1985-02-14,2025-06-08,\"HR, BP\",\"75, 122\"
P1,Alice,1985-02-14,2025-06-01,\"HR, BP\",\"72, 120\"
P2,Bob,1990-07-30,2025-06-02,\"HR, ECG\",\"64, abnormal\"
P2,Bob,1990-07-30,not-a-date,HR,66
P3,Carol,1978-11-02,2025-06-03,\"Temp, SpO2, HR\",\"36.8, 97\"
";

#[test]
fn load_filter_summarize_project_end_to_end() {
    let (_dir, path) = write_temp("summary.csv", SUMMARY_CSV);
    let dataset = load_file(&path).expect("load");

    // P1: 2×2, P2: 2 + 1, P3's mismatched row dropped at normalization.
    assert_eq!(dataset.len(), 7);
    assert!(dataset.has_date_axis);
    assert!(!dataset.patient_ids.contains("P3"));

    // Patient-only filter: all of P1's measurements survive.
    let spec = FilterSpec {
        selected_patients: ["P1".to_string()].into_iter().collect(),
        selected_measurements: Default::default(),
    };
    let view = filtered_indices(&dataset, &spec);
    assert_eq!(view.len(), 4);
    assert!(view.iter().all(|&i| dataset.records[i].patient_id == "P1"));

    let summaries = summarize(&dataset, &view);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].patient_name, "Alice");
    assert_eq!(
        summaries[0]
            .measurement_names
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>(),
        ["BP", "HR"]
    );
    assert_eq!(summaries[0].latest_date.to_string(), "2025-06-08");

    // Temporal projection, points re-ordered by ascending date.
    let (mode, series) = project(&dataset, &view);
    assert_eq!(mode, AxisMode::Temporal);
    assert_eq!(series.len(), 2);
    let hr = series
        .iter()
        .find(|s| s.measurement_name == "HR")
        .expect("HR series");
    let ys: Vec<Option<f64>> = hr.points.iter().map(|p| p.y).collect();
    assert_eq!(ys, [Some(72.0), Some(75.0)]);
}

#[test]
fn non_numeric_values_survive_filtering_and_grouping() {
    let (_dir, path) = write_temp("summary.csv", SUMMARY_CSV);
    let dataset = load_file(&path).expect("load");

    let spec = FilterSpec {
        selected_patients: ["P2".to_string()].into_iter().collect(),
        selected_measurements: Default::default(),
    };
    let view = filtered_indices(&dataset, &spec);
    let summaries = summarize(&dataset, &view);

    // "abnormal" has no magnitude but ECG is still present for P2.
    assert!(summaries[0].measurement_names.contains("ECG"));
    let ecg = view
        .iter()
        .map(|&i| &dataset.records[i])
        .find(|r| r.measurement_name == "ECG")
        .expect("ECG record");
    assert_eq!(ecg.measurement_value, None);
}

#[test]
fn dateless_dataset_is_categorical_everywhere() {
    let csv = "\
patient_id,patient_name,dob,measurement_name,measurement_value
P1,Alice,1985-02-14,\"HR, BP\",\"72, 120\"
P2,Bob,1990-07-30,HR,64
";
    let (_dir, path) = write_temp("summary.csv", csv);
    let dataset = load_file(&path).expect("load");

    assert!(!dataset.has_date_axis);

    let view: Vec<usize> = (0..dataset.len()).collect();
    let (mode, series) = project(&dataset, &view);
    assert_eq!(mode, AxisMode::Categorical);
    assert!(series.iter().all(|s| s.patient_id.is_none()));

    for summary in summarize(&dataset, &view) {
        assert_eq!(summary.latest_date, LatestDate::Unavailable);
    }
}

#[test]
fn exports_reflect_the_filtered_view() {
    let (_dir, path) = write_temp("summary.csv", SUMMARY_CSV);
    let dataset = load_file(&path).expect("load");

    let spec = FilterSpec {
        selected_patients: Default::default(),
        selected_measurements: ["HR".to_string()].into_iter().collect(),
    };
    let view = filtered_indices(&dataset, &spec);

    let out_dir = tempfile::tempdir().expect("tempdir");
    let csv_path = out_dir.path().join("view.csv");
    write_view_csv(&csv_path, &dataset, &view).expect("export");

    let contents = std::fs::read_to_string(&csv_path).expect("read export");
    let lines: Vec<&str> = contents.lines().collect();
    // Header + one HR row per event that carries HR.
    assert_eq!(lines.len(), 1 + view.len());
    assert!(lines[1..].iter().all(|l| l.contains(",HR,")));

    let pdf = generate_report_pdf(&dataset, &view).expect("pdf");
    assert!(pdf.starts_with(b"%PDF"));
}
