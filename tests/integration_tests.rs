use std::fs::File;
use std::io::Write;
use tempfile::TempDir;
use trial_analysis::{
    errors::AnalysisError,
    example_data::ExampleDataGenerator,
    models::{AnalysisReport, ImprovementCategory, ReportTable},
    output::OutputManager,
    parser::WorkbookReader,
    pipeline::AnalysisPipeline,
};

fn write_csv(dir: &TempDir, name: &str, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

#[test]
fn test_complete_analysis_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let (trial, control) = ExampleDataGenerator::generate_cohorts(temp_path, 12).unwrap();

    let sheets = WorkbookReader::load_sheets(&[trial, control]).unwrap();
    assert_eq!(sheets.len(), 2);

    let report = AnalysisPipeline::analyze_workbook(&sheets).unwrap();
    assert_eq!(report.total_sheets, 2);
    assert_eq!(report.processed_sheets, 2);
    assert!(report.has_unpaired_ttest);
    assert!(report.has_improvement_analysis);

    let output_path = temp_path.join("test_output");
    OutputManager::save_results(&report, &output_path).unwrap();

    assert!(output_path.join("complete_results.json").exists());
    assert!(output_path.join("paired_stats_sheet1.csv").exists());
    assert!(output_path.join("paired_stats_sheet2.csv").exists());
    assert!(output_path.join("unpaired_ttest.csv").exists());
    assert!(output_path.join("improvement_percentage.csv").exists());
    assert!(output_path.join("analysis_report.txt").exists());

    // The saved JSON must round-trip to the same report shape.
    let json = std::fs::read_to_string(output_path.join("complete_results.json")).unwrap();
    let reloaded: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, report);
}

#[test]
fn test_single_row_header_cohort() {
    let temp_dir = TempDir::new().unwrap();
    let sheet_path = write_csv(
        &temp_dir,
        "trial.csv",
        &[
            "Vedana BT,Vedana AT 7th,Vedana AT 14th",
            "10,5,2",
            "10,0,10",
            "10,10,5",
        ],
    );

    let sheets = WorkbookReader::load_sheets(&[sheet_path]).unwrap();
    let report = AnalysisPipeline::analyze_workbook(&sheets).unwrap();

    let statistics = report
        .tables
        .iter()
        .find_map(|table| match table {
            ReportTable::StatisticalAnalysis { statistics, .. } => Some(statistics),
            _ => None,
        })
        .unwrap();

    assert_eq!(statistics.len(), 2);
    let day7 = &statistics[0];
    assert_eq!(day7.parameter, "Vedana");
    assert_eq!(day7.assessment_label, "7th day");
    assert_eq!(day7.n, 3);
    assert!((day7.mean_before - 10.0).abs() < 1e-9);
    assert!((day7.mean_after - 5.0).abs() < 1e-9);
    assert!((day7.mean_difference - 5.0).abs() < 1e-9);
    assert!((day7.effectiveness_percent - 50.0).abs() < 1e-9);
    assert!(day7.p_value >= 0.0 && day7.p_value <= 1.0);
}

#[test]
fn test_single_group_improvement_mode() {
    let temp_dir = TempDir::new().unwrap();
    let sheet_path = write_csv(
        &temp_dir,
        "trial.csv",
        &["Vedana BT,Vedana AT 7th", "100,100"],
    );

    let sheets = WorkbookReader::load_sheets(&[sheet_path]).unwrap();
    let report = AnalysisPipeline::analyze_workbook(&sheets).unwrap();
    assert!(!report.has_unpaired_ttest);

    let (improvement, is_single_group) = report
        .tables
        .iter()
        .find_map(|table| match table {
            ReportTable::ImprovementPercentage {
                improvement_data,
                is_single_group,
                ..
            } => Some((improvement_data, *is_single_group)),
            _ => None,
        })
        .unwrap();

    assert!(is_single_group);
    assert!(improvement.group_b.is_none());

    let day7 = &improvement.group_a.time_points[0];
    assert_eq!(day7.time_point, "7th");
    let not_cured = day7
        .buckets
        .iter()
        .find(|b| b.category == ImprovementCategory::NotCured)
        .unwrap();
    assert_eq!(not_cured.count, 1);
    assert_eq!(not_cured.percentage, 100);
}

#[test]
fn test_trial_vs_control_comparison() {
    let temp_dir = TempDir::new().unwrap();
    let trial = write_csv(
        &temp_dir,
        "trial.csv",
        &["Vedana BT,Vedana AT 7th", "10,4", "10,5", "10,6"],
    );
    let control = write_csv(
        &temp_dir,
        "control.csv",
        &["Vedana BT,Vedana AT 7th", "10,7", "10,8", "10,9"],
    );

    let sheets = WorkbookReader::load_sheets(&[trial, control]).unwrap();
    let report = AnalysisPipeline::analyze_workbook(&sheets).unwrap();
    assert!(report.has_unpaired_ttest);

    let statistics = report
        .tables
        .iter()
        .find_map(|table| match table {
            ReportTable::UnpairedTtest { statistics, .. } => Some(statistics),
            _ => None,
        })
        .unwrap();

    assert_eq!(statistics.len(), 1);
    let record = &statistics[0];
    assert_eq!(record.assessment_label, "7th day");
    assert_eq!(record.trial_n, 3);
    assert_eq!(record.control_n, 3);
    assert_eq!(record.degrees_of_freedom, 4);
    assert!((record.mean_difference + 3.0).abs() < 1e-9);
    assert!(record.t_value < 0.0);
}

#[test]
fn test_workbook_without_numeric_data_fails() {
    let temp_dir = TempDir::new().unwrap();
    let sheet_path = write_csv(
        &temp_dir,
        "notes.csv",
        &["Remarks,Comments", "good,stable", "poor,unstable"],
    );

    let sheets = WorkbookReader::load_sheets(&[sheet_path]).unwrap();
    let err = AnalysisPipeline::analyze_workbook(&sheets).unwrap_err();
    assert!(matches!(err, AnalysisError::NoValidData));
}

#[test]
fn test_invalid_sheet_degrades_to_single_group() {
    let temp_dir = TempDir::new().unwrap();
    let trial = write_csv(
        &temp_dir,
        "trial.csv",
        &["Vedana BT,Vedana AT 7th", "10,4", "9,3"],
    );
    // Control sheet has headers but no patient rows.
    let control = write_csv(&temp_dir, "control.csv", &["Vedana BT,Vedana AT 7th"]);

    let sheets = WorkbookReader::load_sheets(&[trial, control]).unwrap();
    let report = AnalysisPipeline::analyze_workbook(&sheets).unwrap();

    assert_eq!(report.total_sheets, 2);
    assert_eq!(report.processed_sheets, 1);
    assert!(!report.has_unpaired_ttest);
    assert!(report.has_improvement_analysis);
}
