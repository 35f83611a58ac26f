//! Robust statistics for light-curve baselines
//!
//! All helpers ignore non-finite samples unless stated otherwise, since noisy
//! photometry after background subtraction can legitimately contain negative
//! values but NaN/inf always indicate a bad sample.

/// Collect the finite values of a slice, preserving order.
pub fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Arithmetic mean of a slice.
///
/// Returns `None` for an empty slice or when the sum overflows to a
/// non-finite value.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let m = values.iter().sum::<f64>() / values.len() as f64;
    m.is_finite().then_some(m)
}

/// Calculate median of a slice of f64 values
///
/// This function computes the median while filtering out NaN values but including
/// infinite values (±inf). For even-length data, returns the average of the two
/// middle values.
///
/// # Arguments
///
/// * `values` - Slice of f64 values to compute median from
///
/// # Returns
///
/// * `Ok(median)` - The median value
/// * `Err(message)` - If no valid values remain after filtering NaN
pub fn median(values: &[f64]) -> Result<f64, String> {
    let mut valid_values: Vec<f64> = values.iter().filter(|v| !v.is_nan()).copied().collect();

    if valid_values.is_empty() {
        return Err(format!(
            "Insufficient data points to compute median: {} total values, 0 valid (all NaN)",
            values.len()
        ));
    }

    valid_values.sort_by(f64::total_cmp);

    let median_value = if valid_values.len() % 2 == 0 {
        let mid = valid_values.len() / 2;
        (valid_values[mid - 1] + valid_values[mid]) / 2.0
    } else {
        valid_values[valid_values.len() / 2]
    };

    Ok(median_value)
}

/// Median of the finite values only.
///
/// Returns `None` when no finite value exists.
pub fn finite_median(values: &[f64]) -> Option<f64> {
    let valid = finite_values(values);
    median(&valid).ok()
}

/// Split a slice into `parts` contiguous chunks of near-equal length.
///
/// Mirrors the usual "array split" convention: when the length is not a
/// multiple of `parts`, the first `len % parts` chunks get one extra element.
/// Chunks may be empty when `parts > len`.
///
/// # Panics
/// Panics if `parts` is zero.
pub fn split_contiguous(values: &[f64], parts: usize) -> Vec<&[f64]> {
    assert!(parts > 0, "cannot split into zero parts");
    let base = values.len() / parts;
    let extra = values.len() % parts;

    let mut chunks = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let len = base + usize::from(i < extra);
        chunks.push(&values[start..start + len]);
        start += len;
    }
    chunks
}

/// Means of `parts` contiguous segments, skipping empty or non-finite segments.
pub fn segment_means(values: &[f64], parts: usize) -> Vec<f64> {
    split_contiguous(values, parts)
        .into_iter()
        .filter_map(mean)
        .collect()
}

/// Mean of the `k` largest values (fewer if the slice is shorter).
pub fn mean_of_top(values: &[f64], k: usize) -> Option<f64> {
    let mut sorted = finite_values(values);
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted.truncate(k);
    mean(&sorted)
}
