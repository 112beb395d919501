use serde::{Deserialize, Serialize};

/// Raw spreadsheet cell as read from a cohort sheet.
///
/// Cell contents arrive loosely typed; anything that parses as a finite
/// number is tagged `Number`, everything else non-blank is `Text`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn from_raw(raw: &str) -> CellValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => CellValue::Number(value),
            _ => CellValue::Text(trimmed.to_string()),
        }
    }

    /// Numeric view of the cell, if any. Text cells get one parse attempt so
    /// number-like strings still count as measurements.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            CellValue::Empty => None,
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Text(text) => text.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One cohort sheet as a raw cell grid, before any header interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    pub index: usize,
    pub column_count: usize,
    pub rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Structured view of one sheet: composite headers plus the patient body.
/// Built once per sheet per run and immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetModel {
    pub sheet_number: usize,
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Columns belonging to one clinical parameter: exactly one before-treatment
/// column and the chronologically ordered after-treatment columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGroup {
    pub name: String,
    pub before_column: usize,
    pub after_columns: Vec<usize>,
    pub after_labels: Vec<String>,
}

/// Paired before/after statistics for one (parameter, assessment) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedStatRecord {
    pub parameter: String,
    pub assessment_label: String,
    pub n: usize,
    pub mean_before: f64,
    pub mean_after: f64,
    pub mean_difference: f64,
    pub sd_before: f64,
    pub sd_after: f64,
    pub sd_difference: f64,
    pub standard_error: f64,
    pub t_value: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    pub effectiveness_percent: f64,
}

/// Trial-vs-control comparison of the after-treatment arms for one matched
/// (parameter, assessment) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnpairedStatRecord {
    pub parameter: String,
    pub assessment_label: String,
    pub trial_n: usize,
    pub trial_mean: f64,
    pub trial_sd: f64,
    pub control_n: usize,
    pub control_mean: f64,
    pub control_sd: f64,
    pub mean_difference: f64,
    pub standard_error: f64,
    pub t_value: f64,
    pub degrees_of_freedom: i64,
    pub p_value: f64,
}

/// Ordered severity categories for per-patient percentage improvement.
/// Ranges are inclusive at the minimum; the top category is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImprovementCategory {
    #[serde(rename = "Cured")]
    Cured,
    #[serde(rename = "Marked improved")]
    MarkedImproved,
    #[serde(rename = "Moderate improved")]
    ModerateImproved,
    #[serde(rename = "Mild improved")]
    MildImproved,
    #[serde(rename = "Not cured")]
    NotCured,
}

impl ImprovementCategory {
    pub const ALL: [ImprovementCategory; 5] = [
        ImprovementCategory::Cured,
        ImprovementCategory::MarkedImproved,
        ImprovementCategory::ModerateImproved,
        ImprovementCategory::MildImproved,
        ImprovementCategory::NotCured,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ImprovementCategory::Cured => "Cured",
            ImprovementCategory::MarkedImproved => "Marked improved",
            ImprovementCategory::ModerateImproved => "Moderate improved",
            ImprovementCategory::MildImproved => "Mild improved",
            ImprovementCategory::NotCured => "Not cured",
        }
    }

    fn minimum_percent(&self) -> f64 {
        match self {
            ImprovementCategory::Cured => 100.0,
            ImprovementCategory::MarkedImproved => 75.0,
            ImprovementCategory::ModerateImproved => 50.0,
            ImprovementCategory::MildImproved => 25.0,
            ImprovementCategory::NotCured => f64::NEG_INFINITY,
        }
    }

    /// First matching category wins, evaluated in severity order.
    pub fn classify(percent: f64) -> ImprovementCategory {
        Self::ALL
            .iter()
            .copied()
            .find(|category| percent >= category.minimum_percent())
            .unwrap_or(ImprovementCategory::NotCured)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketTally {
    pub category: ImprovementCategory,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePointTally {
    pub time_point: String,
    pub total_classified: usize,
    pub buckets: Vec<BucketTally>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortImprovement {
    pub cohort: String,
    pub time_points: Vec<TimePointTally>,
}

/// Improvement distribution per cohort. Cohort B is structurally absent in
/// single-group mode, never zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementTable {
    pub group_a: CohortImprovement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_b: Option<CohortImprovement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportTable {
    StatisticalAnalysis {
        title: String,
        sheet_number: usize,
        sheet_name: String,
        statistics: Vec<PairedStatRecord>,
    },
    UnpairedTtest {
        title: String,
        statistics: Vec<UnpairedStatRecord>,
    },
    ImprovementPercentage {
        title: String,
        improvement_data: ImprovementTable,
        is_single_group: bool,
    },
}

/// Top-level result of one workbook run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub tables: Vec<ReportTable>,
    pub total_sheets: usize,
    pub processed_sheets: usize,
    pub has_improvement_analysis: bool,
    pub has_unpaired_ttest: bool,
}
