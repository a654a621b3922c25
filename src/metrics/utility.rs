/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Rounds to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Mean of the non-null values in a column, rounded for display. 0.0 when nothing is present.
pub fn column_mean(values: impl IntoIterator<Item = Option<f64>>) -> f64 {
    let present: Vec<f64> = values.into_iter().flatten().collect();
    round2(mean(&present))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 6.0]), 3.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_column_mean_skips_nulls() {
        assert_eq!(column_mean([Some(1.0), None, Some(2.0)]), 1.5);
    }

    #[test]
    fn test_column_mean_all_null_is_zero() {
        assert_eq!(column_mean([None, None]), 0.0);
        assert_eq!(column_mean(std::iter::empty()), 0.0);
    }
}
