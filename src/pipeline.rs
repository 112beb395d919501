use crate::errors::AnalysisError;
use crate::header::HeaderAnalyzer;
use crate::grouping::ParameterGrouper;
use crate::improvement::ImprovementClassifier;
use crate::matrix::PatientMatrixReader;
use crate::models::{AnalysisReport, ParameterGroup, ReportTable, SheetModel, Worksheet};
use crate::paired::PairedStatsEngine;
use crate::unpaired::UnpairedStatsEngine;
use crate::Result;

/// One structurally-valid sheet, ready for the statistics engines.
struct SheetAnalysis {
    model: SheetModel,
    groups: Vec<ParameterGroup>,
}

/// Drives one workbook run: per-sheet extraction, paired statistics,
/// trial-vs-control comparison and improvement classification.
///
/// The pipeline is stateless and re-entrant; concurrent requests run
/// independent invocations without shared accumulators.
pub struct AnalysisPipeline;

impl AnalysisPipeline {
    pub fn analyze_workbook(sheets: &[Worksheet]) -> Result<AnalysisReport> {
        log::info!("Analyzing workbook with {} sheet(s)", sheets.len());

        let mut valid = Vec::new();
        for sheet in sheets {
            match Self::prepare_sheet(sheet) {
                Some(analysis) => valid.push(analysis),
                None => log::warn!(
                    "Sheet {} ('{}') excluded: no usable structure",
                    sheet.index + 1,
                    sheet.name
                ),
            }
        }

        let mut tables = Vec::new();
        let mut paired_outputs = Vec::new();
        let mut processed_sheets = 0;

        for analysis in &valid {
            let statistics = PairedStatsEngine::compute(&analysis.model, &analysis.groups);
            if statistics.is_empty() {
                log::warn!(
                    "Sheet {} ('{}') produced no paired statistics",
                    analysis.model.sheet_number,
                    analysis.model.sheet_name
                );
                paired_outputs.push(Vec::new());
                continue;
            }
            processed_sheets += 1;
            paired_outputs.push(statistics.clone());
            tables.push(ReportTable::StatisticalAnalysis {
                title: format!("Statistical Analysis - {}", analysis.model.sheet_name),
                sheet_number: analysis.model.sheet_number,
                sheet_name: analysis.model.sheet_name.clone(),
                statistics,
            });
        }

        if processed_sheets == 0 {
            return Err(AnalysisError::NoValidData);
        }

        let has_unpaired_ttest = valid.len() >= 2;
        if has_unpaired_ttest {
            let statistics = UnpairedStatsEngine::compute(&paired_outputs[0], &paired_outputs[1]);
            log::info!("Unpaired comparison matched {} record(s)", statistics.len());
            tables.push(ReportTable::UnpairedTtest {
                title: "Unpaired t-test: Trial vs Control".to_string(),
                statistics,
            });
        }

        let has_improvement_analysis = !valid.is_empty();
        if has_improvement_analysis {
            let trial = (&valid[0].model, valid[0].groups.as_slice());
            let control = valid.get(1).map(|a| (&a.model, a.groups.as_slice()));
            let improvement_data = ImprovementClassifier::classify(trial, control);
            tables.push(ReportTable::ImprovementPercentage {
                title: "Improvement Percentage Distribution".to_string(),
                improvement_data,
                is_single_group: valid.len() == 1,
            });
        }

        Ok(AnalysisReport {
            tables,
            total_sheets: sheets.len(),
            processed_sheets,
            has_improvement_analysis,
            has_unpaired_ttest,
        })
    }

    fn prepare_sheet(sheet: &Worksheet) -> Option<SheetAnalysis> {
        let layout = HeaderAnalyzer::analyze(sheet);
        let model = PatientMatrixReader::read(sheet, &layout)?;
        let groups = ParameterGrouper::group(&model.headers);
        if groups.is_empty() {
            log::debug!("Sheet '{}' has no parameter groups", sheet.name);
            return None;
        }
        Some(SheetAnalysis { model, groups })
    }
}
