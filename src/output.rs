use crate::models::{
    AnalysisReport, ImprovementTable, PairedStatRecord, ReportTable, UnpairedStatRecord,
};
use crate::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Writes one run's tables to the output directory: the complete JSON
/// document, one CSV per table, and a plain-text report.
pub struct OutputManager;

impl OutputManager {
    pub fn save_results<P: AsRef<Path>>(report: &AnalysisReport, output_path: P) -> Result<()> {
        let output_dir = output_path.as_ref();
        fs::create_dir_all(output_dir)?;

        Self::save_json_results(report, output_dir)?;

        for table in &report.tables {
            match table {
                ReportTable::StatisticalAnalysis {
                    sheet_number,
                    statistics,
                    ..
                } => Self::save_paired_csv(*sheet_number, statistics, output_dir)?,
                ReportTable::UnpairedTtest { statistics, .. } => {
                    Self::save_unpaired_csv(statistics, output_dir)?
                }
                ReportTable::ImprovementPercentage {
                    improvement_data, ..
                } => Self::save_improvement_csv(improvement_data, output_dir)?,
            }
        }

        Self::generate_analysis_report(report, output_dir)?;

        log::info!("Results saved to: {}", output_dir.display());
        Ok(())
    }

    fn save_json_results(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
        let file_path = output_dir.join("complete_results.json");
        let json_string = serde_json::to_string_pretty(report)?;
        fs::write(file_path, json_string)?;
        Ok(())
    }

    fn save_paired_csv(
        sheet_number: usize,
        statistics: &[PairedStatRecord],
        output_dir: &Path,
    ) -> Result<()> {
        let file_path = output_dir.join(format!("paired_stats_sheet{}.csv", sheet_number));
        let mut file = File::create(file_path)?;

        writeln!(
            file,
            "PARAMETER,ASSESSMENT,N,MEAN_BT,MEAN_AT,MEAN_DIFF,SD_BT,SD_AT,SD_DIFF,SE,T_VALUE,DF,P_VALUE,EFFECTIVENESS_PERCENT"
        )?;
        for record in statistics {
            writeln!(
                file,
                "{},{},{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{},{:.6},{:.2}",
                record.parameter,
                record.assessment_label,
                record.n,
                record.mean_before,
                record.mean_after,
                record.mean_difference,
                record.sd_before,
                record.sd_after,
                record.sd_difference,
                record.standard_error,
                record.t_value,
                record.degrees_of_freedom,
                record.p_value,
                record.effectiveness_percent,
            )?;
        }

        Ok(())
    }

    fn save_unpaired_csv(statistics: &[UnpairedStatRecord], output_dir: &Path) -> Result<()> {
        let file_path = output_dir.join("unpaired_ttest.csv");
        let mut file = File::create(file_path)?;

        writeln!(
            file,
            "PARAMETER,ASSESSMENT,TRIAL_N,TRIAL_MEAN,TRIAL_SD,CONTROL_N,CONTROL_MEAN,CONTROL_SD,MEAN_DIFF,SE,T_VALUE,DF,P_VALUE"
        )?;
        for record in statistics {
            writeln!(
                file,
                "{},{},{},{:.6},{:.6},{},{:.6},{:.6},{:.6},{:.6},{:.6},{},{:.6}",
                record.parameter,
                record.assessment_label,
                record.trial_n,
                record.trial_mean,
                record.trial_sd,
                record.control_n,
                record.control_mean,
                record.control_sd,
                record.mean_difference,
                record.standard_error,
                record.t_value,
                record.degrees_of_freedom,
                record.p_value,
            )?;
        }

        Ok(())
    }

    fn save_improvement_csv(table: &ImprovementTable, output_dir: &Path) -> Result<()> {
        let file_path = output_dir.join("improvement_percentage.csv");
        let mut file = File::create(file_path)?;

        writeln!(file, "COHORT,TIME_POINT,CATEGORY,COUNT,PERCENTAGE")?;
        let mut cohorts = vec![&table.group_a];
        if let Some(group_b) = &table.group_b {
            cohorts.push(group_b);
        }
        for cohort in cohorts {
            for time_point in &cohort.time_points {
                for bucket in &time_point.buckets {
                    writeln!(
                        file,
                        "{},{},{},{},{}",
                        cohort.cohort,
                        time_point.time_point,
                        bucket.category.label(),
                        bucket.count,
                        bucket.percentage,
                    )?;
                }
            }
        }

        Ok(())
    }

    fn generate_analysis_report(report: &AnalysisReport, output_dir: &Path) -> Result<()> {
        let file_path = output_dir.join("analysis_report.txt");
        let mut file = File::create(file_path)?;

        writeln!(file, "CLINICAL TRIAL COMPARISON ANALYSIS REPORT")?;
        writeln!(file, "=========================================")?;
        writeln!(file)?;
        writeln!(file, "Sheets in workbook: {}", report.total_sheets)?;
        writeln!(file, "Sheets analyzed: {}", report.processed_sheets)?;
        writeln!(file)?;

        for table in &report.tables {
            match table {
                ReportTable::StatisticalAnalysis {
                    title, statistics, ..
                } => {
                    writeln!(file, "{}", title)?;
                    for record in statistics {
                        writeln!(
                            file,
                            "- {} ({}): n={}, mean diff={:.3}, t={:.3}, p={:.4}",
                            record.parameter,
                            record.assessment_label,
                            record.n,
                            record.mean_difference,
                            record.t_value,
                            record.p_value,
                        )?;
                    }
                    writeln!(file)?;
                }
                ReportTable::UnpairedTtest { title, statistics } => {
                    writeln!(file, "{}", title)?;
                    for record in statistics {
                        writeln!(
                            file,
                            "- {} ({}): trial mean={:.3}, control mean={:.3}, t={:.3}, p={:.4}",
                            record.parameter,
                            record.assessment_label,
                            record.trial_mean,
                            record.control_mean,
                            record.t_value,
                            record.p_value,
                        )?;
                    }
                    writeln!(file)?;
                }
                ReportTable::ImprovementPercentage {
                    title,
                    improvement_data,
                    is_single_group,
                } => {
                    writeln!(file, "{}", title)?;
                    if *is_single_group {
                        writeln!(file, "(single-group mode)")?;
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
                            writeln!(
                                file,
                                "Cohort {} at {} (n={}):",
                                cohort.cohort,
                                time_point.time_point,
                                time_point.total_classified,
                            )?;
                            for bucket in &time_point.buckets {
                                writeln!(
                                    file,
                                    "  {}: {} ({}%)",
                                    bucket.category.label(),
                                    bucket.count,
                                    bucket.percentage,
                                )?;
                            }
                        }
                    }
                    writeln!(file)?;
                }
            }
        }

        Ok(())
    }
}
