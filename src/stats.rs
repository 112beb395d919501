//! Shared numeric primitives used by every statistics engine.

use statrs::statistics::Statistics;

/// Arithmetic mean; 0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.mean()
    }
}

/// Sample standard deviation (n-1 denominator); 0 below two observations.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.std_dev()
    }
}

/// Abramowitz-Stegun rational approximation of the error function.
///
/// The coefficients are fixed: downstream p-values must stay reproducible,
/// so this must not be swapped for a higher-precision implementation.
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// t-statistic with the zero-standard-error convention: 0 when the mean
/// difference is also 0, signed infinity otherwise.
pub fn t_statistic(mean_difference: f64, standard_error: f64) -> f64 {
    if standard_error == 0.0 {
        if mean_difference == 0.0 {
            0.0
        } else if mean_difference > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    } else {
        mean_difference / standard_error
    }
}

/// Two-tailed p-value from a t statistic.
///
/// The degrees of freedom are carried for reporting only; the p-value always
/// uses the normal approximation regardless of df. An infinite t resolves
/// to p = 0.
pub fn two_tailed_p_value(t: f64, _df: i64) -> f64 {
    if !t.is_finite() {
        return if t == 0.0 { 1.0 } else { 0.0 };
    }
    let p = 2.0 * (1.0 - normal_cdf(t.abs()));
    p.clamp(0.0, 1.0)
}
