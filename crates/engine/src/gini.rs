//! Gini coefficient for call-distribution fairness metrics (SPEC_FULL §4.4, §6.1).

/// The Gini coefficient of `values` in `[0.0, 1.0]`, via the Lorenz-curve
/// formulation: `G = sum(|x_i - x_j|) / (2 * n^2 * mean)`. Zero when every
/// resident carries an identical number of calls; closer to one the more
/// unevenly calls are distributed.
///
/// Returns `0.0` for an empty slice or when every value is zero, since
/// "zero calls assigned to anyone" is not a fairness violation.
pub fn gini_coefficient(values: &[u32]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let total: u64 = values.iter().map(|v| *v as u64).sum();
    if total == 0 {
        return 0.0;
    }
    let mean = total as f64 / n as f64;
    let mut abs_diff_sum = 0.0f64;
    for &a in values {
        for &b in values {
            abs_diff_sum += (a as f64 - b as f64).abs();
        }
    }
    abs_diff_sum / (2.0 * (n as f64).powi(2) * mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_even_distribution_is_zero() {
        assert_eq!(gini_coefficient(&[4, 4, 4, 4]), 0.0);
    }

    #[test]
    fn all_zero_is_zero_not_nan() {
        assert_eq!(gini_coefficient(&[0, 0, 0]), 0.0);
    }

    #[test]
    fn empty_slice_is_zero() {
        assert_eq!(gini_coefficient(&[]), 0.0);
    }

    #[test]
    fn concentrated_distribution_is_higher_than_even() {
        let even = gini_coefficient(&[5, 5, 5, 5]);
        let skewed = gini_coefficient(&[20, 0, 0, 0]);
        assert!(skewed > even);
        assert!(skewed <= 1.0);
    }
}
