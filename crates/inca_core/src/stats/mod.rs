//! Small deterministic statistics helpers shared by the aggregators and quality checks.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile on the nearest-rank-with-linear-interpolation convention: for sorted
/// samples x0..x(n-1) and percentile p, rank h = (n - 1) * p / 100 and the result
/// interpolates between x(floor h) and x(ceil h). Fixed here exactly so aggregate values
/// are reproducible across runs and in tests.
pub fn percentile_linear(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let h = (sorted.len() - 1) as f64 * p / 100.0;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

pub fn median(values: &[f64]) -> Option<f64> {
    percentile_linear(values, 50.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_between_ranks() {
        let values = [1.0, 2.0, 3.0, 4.0, 10.0];
        // h = 0.9 * 4 = 3.6 -> 4 + 0.6 * (10 - 4)
        assert_eq!(percentile_linear(&values, 90.0), Some(7.6));
        assert_eq!(median(&values), Some(3.0));
        assert_eq!(median(&[5.0, 1.0]), Some(3.0));
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(percentile_linear(&[], 90.0), None);
    }
}
