use chrono::{Days, NaiveDate};

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (id, name, dob, measurement panel with baseline and noise)
    let patients: [(&str, &str, &str, &[(&str, f64, f64)]); 4] = [
        (
            "P001",
            "Alice Johnson",
            "1985-02-14",
            &[("HR", 72.0, 4.0), ("BP_sys", 121.0, 6.0), ("BP_dia", 79.0, 4.0)],
        ),
        (
            "P002",
            "Bob Martinez",
            "1990-07-30",
            &[("HR", 64.0, 3.0), ("SpO2", 97.5, 0.8)],
        ),
        (
            "P003",
            "Carol Singh",
            "1978-11-02",
            &[("HR", 78.0, 5.0), ("Temp", 36.8, 0.3), ("SpO2", 96.0, 1.0)],
        ),
        (
            "P004",
            "David Okafor",
            "2001-03-19",
            &[("Temp", 36.6, 0.2), ("BP_sys", 117.0, 5.0)],
        ),
    ];

    let first_visit = NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date");
    let weekly_visits = 8u64;

    let output_path = "medical_data_summary.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "patient_id",
            "patient_name",
            "dob",
            "date",
            "measurement_name",
            "measurement_value",
        ])
        .expect("Failed to write header");

    let mut rows = 0usize;
    for (id, name, dob, panel) in &patients {
        for week in 0..weekly_visits {
            let date = first_visit
                .checked_add_days(Days::new(week * 7))
                .expect("valid date")
                .format("%Y-%m-%d")
                .to_string();

            let names: Vec<&str> = panel.iter().map(|(m, _, _)| *m).collect();
            let values: Vec<String> = panel
                .iter()
                .map(|(_, baseline, noise)| format!("{:.1}", rng.gauss(*baseline, *noise)))
                .collect();
            let packed_names = names.join(", ");
            let packed_values = values.join(", ");

            writer
                .write_record([
                    *id,
                    *name,
                    *dob,
                    date.as_str(),
                    packed_names.as_str(),
                    packed_values.as_str(),
                ])
                .expect("Failed to write row");
            rows += 1;
        }
    }

    // Anomaly rows the dashboard must absorb without failing the load:
    // a non-numeric value token, an unparsable date, and a wide row whose
    // name/value lists disagree in length (rejected at normalization).
    writer
        .write_record([
            "P001",
            "Alice Johnson",
            "1985-02-14",
            "2025-07-30",
            "HR, ECG",
            "71.8, abnormal",
        ])
        .expect("Failed to write row");
    writer
        .write_record([
            "P002",
            "Bob Martinez",
            "1990-07-30",
            "not-a-date",
            "HR",
            "65.2",
        ])
        .expect("Failed to write row");
    writer
        .write_record([
            "P003",
            "Carol Singh",
            "1978-11-02",
            "2025-07-31",
            "HR, Temp, SpO2",
            "77.1, 36.9",
        ])
        .expect("Failed to write row");
    rows += 3;

    writer.flush().expect("Failed to flush output");
    println!("Wrote {rows} wide rows to {output_path}");
}
