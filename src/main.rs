use clap::{Arg, Command};
use trial_analysis::{
    errors::AnalysisError,
    example_data::ExampleDataGenerator,
    models::{AnalysisReport, ReportTable},
    output::OutputManager,
    parser::WorkbookReader,
    pipeline::AnalysisPipeline,
    Result,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("Trial Comparison Tool")
        .version("1.0")
        .about("Paired/unpaired significance tests and improvement distributions for cohort sheets")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Cohort sheet CSV; repeat for trial and control sheets")
                .action(clap::ArgAction::Append)
                .required_unless_present("generate-example"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for results")
                .default_value("./analysis_results"),
        )
        .arg(
            Arg::new("generate-example")
                .long("generate-example")
                .help("Generate example trial/control cohort sheets")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("patients")
                .short('n')
                .long("patients")
                .value_name("NUMBER")
                .help("Number of patients per example cohort")
                .default_value("20"),
        )
        .get_matches();

    let output_dir = PathBuf::from(matches.get_one::<String>("output").unwrap());

    if matches.get_flag("generate-example") {
        let n_patients: usize = matches
            .get_one::<String>("patients")
            .unwrap()
            .parse()
            .map_err(|_| AnalysisError::ParseError("Invalid number of patients".to_string()))?;

        std::fs::create_dir_all(&output_dir)?;
        let (trial, control) = ExampleDataGenerator::generate_cohorts(&output_dir, n_patients)?;
        println!("Generated example cohorts:");
        println!("  {}", trial.display());
        println!("  {}", control.display());

        if !matches.contains_id("input") {
            return run_analysis(&[trial, control], &output_dir);
        }
    }

    let inputs: Vec<PathBuf> = matches
        .get_many::<String>("input")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();

    if inputs.is_empty() {
        println!("No input sheets specified. Use --generate-example to create sample data.");
        return Ok(());
    }

    run_analysis(&inputs, &output_dir)
}

fn run_analysis(inputs: &[PathBuf], output_dir: &PathBuf) -> Result<()> {
    println!("Starting trial comparison analysis...");
    for input in inputs {
        println!("Input sheet: {}", input.display());
    }
    println!("Output directory: {}", output_dir.display());

    let sheets = WorkbookReader::load_sheets(inputs)?;

    let start_time = std::time::Instant::now();
    let report = AnalysisPipeline::analyze_workbook(&sheets)?;
    let duration = start_time.elapsed();
    println!("Analysis completed in {:.2} seconds", duration.as_secs_f64());

    OutputManager::save_results(&report, output_dir)?;

    print_analysis_summary(&report);

    Ok(())
}

fn print_analysis_summary(report: &AnalysisReport) {
    println!("\n=== ANALYSIS SUMMARY ===");
    println!("Sheets in workbook: {}", report.total_sheets);
    println!("Sheets analyzed: {}", report.processed_sheets);

    for table in &report.tables {
        match table {
            ReportTable::StatisticalAnalysis {
                title, statistics, ..
            } => {
                println!("\n{}", title);
                for record in statistics {
                    let marker = if record.p_value < 0.05 { " *" } else { "" };
                    println!(
                        "  {} ({}): n={}, effectiveness={:.1}%, p={:.4}{}",
                        record.parameter,
                        record.assessment_label,
                        record.n,
                        record.effectiveness_percent,
                        record.p_value,
                        marker,
                    );
                }
            }
            ReportTable::UnpairedTtest { title, statistics } => {
                println!("\n{}", title);
                for record in statistics {
                    let marker = if record.p_value < 0.05 { " *" } else { "" };
                    println!(
                        "  {} ({}): mean diff={:.3}, t={:.3}, p={:.4}{}",
                        record.parameter,
                        record.assessment_label,
                        record.mean_difference,
                        record.t_value,
                        record.p_value,
                        marker,
                    );
                }
            }
            ReportTable::ImprovementPercentage {
                title,
                improvement_data,
                is_single_group,
            } => {
                println!("\n{}", title);
                if *is_single_group {
                    println!("  Single-group mode (no control cohort)");
                }
                let mut cohorts = vec![&improvement_data.group_a];
                if let Some(group_b) = &improvement_data.group_b {
                    cohorts.push(group_b);
                }
                for cohort in cohorts {
                    for time_point in &cohort.time_points {
                        if time_point.total_classified == 0 {
                            continue;
                        }
                        let summary: Vec<String> = time_point
                            .buckets
                            .iter()
                            .filter(|bucket| bucket.count > 0)
                            .map(|bucket| {
                                format!("{} {}%", bucket.category.label(), bucket.percentage)
                            })
                            .collect();
                        println!(
                            "  Cohort {} at {}: {}",
                            cohort.cohort,
                            time_point.time_point,
                            summary.join(", "),
                        );
                    }
                }
            }
        }
    }

    println!("\nResults saved to output directory.");
}
