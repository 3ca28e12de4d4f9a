//! Scalar reductions shared by the pipeline stages
//!
//! The standard deviation uses the sample (n - 1) convention; it is the only
//! second-moment statistic in the crate, so the convention is uniform by
//! construction. Reductions over empty input yield NaN rather than an error;
//! the pipeline stages document what the resulting degenerate windows and
//! baselines do.

/// Arithmetic mean; NaN for empty input
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = values.iter().sum();
    sum / values.len() as f64
}

/// Median; averages the two middle values for even counts. NaN for empty
/// input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n - 1 denominator); NaN for fewer than two
/// values, zero when all values are identical.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() as f64 - 1.0)).sqrt()
}
