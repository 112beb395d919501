use crate::models::{CellValue, PairedStatRecord, ParameterGroup, SheetModel};
use crate::stats;
use once_cell::sync::Lazy;
use regex::Regex;

/// Literal day-number search in after-column headers.
static DAY_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(7|14|21|28)").unwrap());

/// Ordinal fallback, e.g. "3rd".
static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\d+)(st|nd|rd|th)\b").unwrap());

/// Positional labels for after-columns whose headers carry no day hint.
const DEFAULT_ASSESSMENT_LABELS: [&str; 4] = ["7th day", "14th day", "21st day", "28th day"];

/// Computes before/after paired statistics for every (parameter,
/// after-column) combination of a sheet.
pub struct PairedStatsEngine;

impl PairedStatsEngine {
    pub fn compute(model: &SheetModel, groups: &[ParameterGroup]) -> Vec<PairedStatRecord> {
        let mut records = Vec::new();
        for group in groups {
            for (k, &after_col) in group.after_columns.iter().enumerate() {
                let (before, after) = Self::paired_samples(model, group.before_column, after_col);
                if before.is_empty() {
                    log::debug!(
                        "No paired samples for '{}' after-column {}",
                        group.name,
                        after_col
                    );
                    continue;
                }
                let label = Self::assessment_label(&group.after_labels[k], k);
                records.push(Self::build_record(&group.name, label, &before, &after));
            }
        }
        records
    }

    /// Rows where both cells parse as finite numbers, collected per
    /// after-column independently: a patient may contribute to one
    /// assessment's statistics and not another's.
    fn paired_samples(
        model: &SheetModel,
        before_col: usize,
        after_col: usize,
    ) -> (Vec<f64>, Vec<f64>) {
        let mut before = Vec::new();
        let mut after = Vec::new();
        for row in &model.rows {
            let b = row.get(before_col).and_then(CellValue::as_number);
            let a = row.get(after_col).and_then(CellValue::as_number);
            if let (Some(b), Some(a)) = (b, a) {
                before.push(b);
                after.push(a);
            }
        }
        (before, after)
    }

    fn build_record(
        parameter: &str,
        assessment_label: String,
        before: &[f64],
        after: &[f64],
    ) -> PairedStatRecord {
        let n = before.len();
        let differences: Vec<f64> = before.iter().zip(after).map(|(b, a)| b - a).collect();

        let mean_before = stats::mean(before);
        let mean_after = stats::mean(after);
        let mean_difference = stats::mean(&differences);
        let sd_before = stats::sample_std_dev(before);
        let sd_after = stats::sample_std_dev(after);
        let sd_difference = stats::sample_std_dev(&differences);

        let standard_error = sd_difference / (n as f64).sqrt();
        let t_value = stats::t_statistic(mean_difference, standard_error);
        let degrees_of_freedom = n - 1;
        let p_value = stats::two_tailed_p_value(t_value, degrees_of_freedom as i64);
        let effectiveness_percent = if mean_before == 0.0 {
            0.0
        } else {
            mean_difference / mean_before * 100.0
        };

        PairedStatRecord {
            parameter: parameter.to_string(),
            assessment_label,
            n,
            mean_before,
            mean_after,
            mean_difference,
            sd_before,
            sd_after,
            sd_difference,
            standard_error,
            t_value,
            degrees_of_freedom,
            p_value,
            effectiveness_percent,
        }
    }

    /// Derives the human-readable assessment label from an after-column
    /// header: literal day number first, then an ordinal, then a verbatim
    /// "day" header, then the positional default.
    fn assessment_label(header: &str, k: usize) -> String {
        if let Some(found) = DAY_TOKEN_RE.find(header) {
            return format!("{}th day", found.as_str());
        }
        if let Some(caps) = ORDINAL_RE.captures(header) {
            return format!("{}th day", &caps[1]);
        }
        if header.to_lowercase().contains("day") {
            return header.to_string();
        }
        DEFAULT_ASSESSMENT_LABELS
            .get(k)
            .map(|label| label.to_string())
            .unwrap_or_else(|| format!("Assessment {}", k + 1))
    }
}
