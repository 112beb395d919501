use crate::grouping::normalize_label;
use crate::models::{PairedStatRecord, UnpairedStatRecord};
use crate::stats;

/// Combines two sheets' paired statistics into a trial-vs-control unpaired
/// comparison. Each cohort's after-treatment mean/SD serves as its
/// comparison arm; unmatched trial records are dropped silently.
pub struct UnpairedStatsEngine;

impl UnpairedStatsEngine {
    pub fn compute(
        trial: &[PairedStatRecord],
        control: &[PairedStatRecord],
    ) -> Vec<UnpairedStatRecord> {
        trial
            .iter()
            .filter_map(|trial_record| {
                let control_record = control.iter().find(|c| {
                    normalize_label(&c.parameter) == normalize_label(&trial_record.parameter)
                        && c.assessment_label == trial_record.assessment_label
                })?;
                Some(Self::build_record(trial_record, control_record))
            })
            .collect()
    }

    fn build_record(trial: &PairedStatRecord, control: &PairedStatRecord) -> UnpairedStatRecord {
        let mean_difference = trial.mean_after - control.mean_after;
        let n1 = trial.n as f64;
        let n2 = control.n as f64;
        let standard_error =
            (trial.sd_after.powi(2) / n1 + control.sd_after.powi(2) / n2).sqrt();
        let t_value = stats::t_statistic(mean_difference, standard_error);
        // Not clamped: tiny samples may legitimately go negative here.
        let degrees_of_freedom = trial.n as i64 + control.n as i64 - 2;
        let p_value = stats::two_tailed_p_value(t_value, degrees_of_freedom);

        UnpairedStatRecord {
            parameter: trial.parameter.clone(),
            assessment_label: trial.assessment_label.clone(),
            trial_n: trial.n,
            trial_mean: trial.mean_after,
            trial_sd: trial.sd_after,
            control_n: control.n,
            control_mean: control.mean_after,
            control_sd: control.sd_after,
            mean_difference,
            standard_error,
            t_value,
            degrees_of_freedom,
            p_value,
        }
    }
}
