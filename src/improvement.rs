use crate::models::{
    BucketTally, CellValue, CohortImprovement, ImprovementCategory, ImprovementTable,
    ParameterGroup, SheetModel, TimePointTally,
};
use crate::stats;

/// Canonical follow-up time points, in chronological order. Time point i
/// reads each group's i-th after-column.
pub const TIME_POINTS: [&str; 4] = ["7th", "14th", "21st", "28th"];

/// Buckets each patient's average percentage improvement into the five
/// ordered severity categories, per time point and cohort.
pub struct ImprovementClassifier;

impl ImprovementClassifier {
    pub fn classify(
        trial: (&SheetModel, &[ParameterGroup]),
        control: Option<(&SheetModel, &[ParameterGroup])>,
    ) -> ImprovementTable {
        let group_a = Self::classify_cohort("A", trial.0, trial.1);
        let group_b = control.map(|(model, groups)| Self::classify_cohort("B", model, groups));
        ImprovementTable { group_a, group_b }
    }

    fn classify_cohort(
        cohort: &str,
        model: &SheetModel,
        groups: &[ParameterGroup],
    ) -> CohortImprovement {
        let time_points = TIME_POINTS
            .iter()
            .enumerate()
            .map(|(time_idx, time_point)| {
                let scores: Vec<f64> = model
                    .rows
                    .iter()
                    .filter_map(|row| Self::patient_improvement(row, groups, time_idx))
                    .collect();
                Self::tally(time_point, &scores)
            })
            .collect();
        CohortImprovement {
            cohort: cohort.to_string(),
            time_points,
        }
    }

    /// Average percentage improvement across parameter groups for one patient
    /// at one time point. `None` when no group contributes; such patients are
    /// excluded from the tally denominator, never counted as 0%.
    fn patient_improvement(
        row: &[CellValue],
        groups: &[ParameterGroup],
        time_idx: usize,
    ) -> Option<f64> {
        let mut percents = Vec::new();
        for group in groups {
            let Some(&after_col) = group.after_columns.get(time_idx) else {
                continue;
            };
            let before = row.get(group.before_column).and_then(CellValue::as_number);
            let after = row.get(after_col).and_then(CellValue::as_number);
            if let (Some(before), Some(after)) = (before, after) {
                if before != 0.0 {
                    percents.push((before - after) / before * 100.0);
                }
            }
        }
        if percents.is_empty() {
            None
        } else {
            Some(stats::mean(&percents))
        }
    }

    fn tally(time_point: &str, scores: &[f64]) -> TimePointTally {
        let total = scores.len();
        let mut counts = [0usize; ImprovementCategory::ALL.len()];
        for &score in scores {
            counts[ImprovementCategory::classify(score) as usize] += 1;
        }

        let buckets = ImprovementCategory::ALL
            .iter()
            .enumerate()
            .map(|(idx, &category)| {
                let count = counts[idx];
                let percentage = if total == 0 {
                    0
                } else {
                    (count as f64 / total as f64 * 100.0).round() as u32
                };
                BucketTally {
                    category,
                    count,
                    percentage,
                }
            })
            .collect();

        TimePointTally {
            time_point: time_point.to_string(),
            total_classified: total,
            buckets,
        }
    }
}
