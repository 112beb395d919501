use crate::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const PARAMETERS: [&str; 3] = ["Pain", "Swelling", "Tenderness"];
const DAY_LABELS: [&str; 4] = ["7th day", "14th day", "21st day", "28th day"];

/// Generates a seeded trial/control sheet pair with a 3-row header so the
/// demo run exercises header detection, grouping and every statistics
/// engine.
pub struct ExampleDataGenerator;

impl ExampleDataGenerator {
    pub fn generate_cohorts<P: AsRef<Path>>(
        output_dir: P,
        n_patients: usize,
    ) -> Result<(PathBuf, PathBuf)> {
        let output_dir = output_dir.as_ref();
        let trial_path = output_dir.join("trial_cohort.csv");
        let control_path = output_dir.join("control_cohort.csv");

        // Trial cohort responds more strongly than control.
        Self::generate_sheet(&trial_path, n_patients, 0.65, 42)?;
        Self::generate_sheet(&control_path, n_patients, 0.30, 43)?;

        log::info!(
            "Generated example cohorts with {} patients each",
            n_patients
        );
        Ok((trial_path, control_path))
    }

    fn generate_sheet(path: &Path, n_patients: usize, response: f64, seed: u64) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(seed); // Reproducible results
        let mut file = File::create(path)?;

        Self::write_header(&mut file)?;

        for patient in 1..=n_patients {
            let mut cells = vec![patient.to_string()];
            for _ in PARAMETERS {
                let before = rng.gen_range(5..=10);
                cells.push(before.to_string());
                for (day, _) in DAY_LABELS.iter().enumerate() {
                    // Severity declines with follow-up; a small fraction of
                    // cells stay blank to mimic missed assessments.
                    if rng.gen_bool(0.05) {
                        cells.push(String::new());
                        continue;
                    }
                    let progress = (day + 1) as f64 / DAY_LABELS.len() as f64;
                    let noise: f64 = rng.gen_range(-1.0..1.0);
                    let after = (before as f64 * (1.0 - response * progress) + noise)
                        .round()
                        .max(0.0);
                    cells.push((after as i64).to_string());
                }
            }
            writeln!(file, "{}", cells.join(","))?;
        }

        Ok(())
    }

    fn write_header(file: &mut File) -> Result<()> {
        let mut top = vec!["Sl. No".to_string()];
        let mut markers = vec![String::new()];
        let mut days = vec![String::new()];
        for parameter in PARAMETERS {
            top.push(parameter.to_string());
            markers.push("BT".to_string());
            days.push(String::new());
            for day_label in DAY_LABELS {
                top.push(parameter.to_string());
                markers.push("AT".to_string());
                days.push(day_label.to_string());
            }
        }
        writeln!(file, "{}", top.join(","))?;
        writeln!(file, "{}", markers.join(","))?;
        writeln!(file, "{}", days.join(","))?;
        Ok(())
    }
}
