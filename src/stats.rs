/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N), 0.0 for an empty slice.
pub fn stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Keeps the answered values; 0 marks a missing score.
pub fn valid(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    values.into_iter().filter(|v| *v != 0.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inputs_degrade_to_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(stddev(&[]), 0.0);
    }

    #[test]
    fn constant_series() {
        assert_eq!(mean(&[4.0, 4.0, 4.0]), 4.0);
        assert_eq!(stddev(&[4.0, 4.0, 4.0]), 0.0);
    }

    #[test]
    fn population_deviation() {
        assert!((stddev(&[5.0, 3.0]) - 1.0).abs() < 1e-10);
        // mean 5, squared deviations sum to 32 over 8 values
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((stddev(&values) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn order_does_not_matter() {
        let a = [1.0, 2.5, 4.0, 5.0];
        let b = [5.0, 4.0, 1.0, 2.5];
        assert!((mean(&a) - mean(&b)).abs() < 1e-12);
        assert!((stddev(&a) - stddev(&b)).abs() < 1e-12);
    }

    #[test]
    fn valid_drops_sentinel_zeros() {
        assert_eq!(valid([0.0, 3.0, 0.0, 4.5]), vec![3.0, 4.5]);
    }
}
