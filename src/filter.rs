//! Outlier filtering
//!
//! This module provides the SD-window outlier predicate (mean ± factor * SD)
//! and a generic row filter that reapplies a predicate until the surviving
//! set is stable.

use crate::stats;

/// Default threshold window width in standard deviations
pub const DEFAULT_FILTERING_FACTOR: f64 = 2.5;

/// SD-based outlier window: values are retained only strictly inside
/// mean ± factor * SD.
///
/// Boundary values count as outliers. When every value is identical the
/// standard deviation is zero, the open interval is empty and every value is
/// rejected; likewise a window over fewer than two values has no defined
/// spread and rejects everything. Both are intended degenerate results, not
/// errors.
#[derive(Debug, Clone, Copy)]
pub struct SdWindowFilter {
    factor: f64,
}

impl Default for SdWindowFilter {
    fn default() -> Self {
        Self::new(DEFAULT_FILTERING_FACTOR)
    }
}

impl SdWindowFilter {
    /// Create a window with the given width factor (must be > 0)
    pub fn new(factor: f64) -> Self {
        debug_assert!(factor > 0.0, "window factor must be positive");
        Self { factor }
    }

    /// Mask a column of values; `false` marks an outlier
    pub fn mask(&self, values: &[f64]) -> Vec<bool> {
        let mean = stats::mean(values);
        let threshold = stats::std_dev(values) * self.factor;
        let (min_val, max_val) = (mean - threshold, mean + threshold);
        values.iter().map(|&v| min_val < v && v < max_val).collect()
    }
}

/// Apply a mask function to rows once, keeping the rows it marks `true`.
///
/// `column` extracts the filtered value from each row; `mask_f` maps the
/// extracted column to a same-length boolean mask. A mask function that
/// panics on malformed input is not caught here.
pub fn filter_once<T, C, M>(rows: Vec<T>, column: C, mask_f: M) -> Vec<T>
where
    C: Fn(&T) -> f64,
    M: Fn(&[f64]) -> Vec<bool>,
{
    let values: Vec<f64> = rows.iter().map(&column).collect();
    let mask = mask_f(&values);
    rows.into_iter()
        .zip(mask)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}

/// Filter rows until stable: reapply the mask function until a round removes
/// no rows.
///
/// Every round either removes at least one row or terminates the loop, so
/// the round count is bounded by the input size; the explicit bound below
/// only guards against a mask function that breaks that contract.
pub fn filter_to_fixed_point<T, C, M>(rows: Vec<T>, column: C, mask_f: M) -> Vec<T>
where
    C: Fn(&T) -> f64,
    M: Fn(&[f64]) -> Vec<bool>,
{
    let mut current = rows;
    let max_rounds = current.len() + 1;
    for _ in 0..max_rounds {
        let before = current.len();
        current = filter_once(current, &column, &mask_f);
        if current.len() == before {
            break;
        }
    }
    current
}
