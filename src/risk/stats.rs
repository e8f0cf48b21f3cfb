//! Scalar statistics over return series. All functions treat an empty
//! input as zero rather than an error, matching the dashboard's
//! degrade-to-empty behavior.

/// Arithmetic mean
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentile in [0, 100] by linear interpolation between order statistics
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Percent change between consecutive balances. Non-positive predecessors
/// are skipped so the division is always defined.
pub fn step_returns(balances: &[f64]) -> Vec<f64> {
    if balances.len() < 2 {
        return Vec::new();
    }
    let mut returns = Vec::with_capacity(balances.len() - 1);
    for i in 1..balances.len() {
        let previous = balances[i - 1];
        if previous > 0.0 {
            returns.push((balances[i] - previous) / previous * 100.0);
        }
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_std_dev_on_known_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), 5.0);
        assert_eq!(std_dev(&values), 2.0);
    }

    #[test]
    fn empty_inputs_collapse_to_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(percentile(&[], 5.0), 0.0);
        assert!(step_returns(&[]).is_empty());
        assert!(step_returns(&[10_000.0]).is_empty());
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let values = [10.0, 20.0];
        assert_eq!(percentile(&values, 50.0), 15.0);

        // Ranks land exactly on order statistics for 0..=100
        let ladder: Vec<f64> = (0..=100).map(|v| v as f64).collect();
        assert_eq!(percentile(&ladder, 5.0), 5.0);
        assert_eq!(percentile(&ladder, 100.0), 100.0);

        // Unsorted input is sorted internally
        let shuffled = [30.0, 10.0, 20.0];
        assert_eq!(percentile(&shuffled, 0.0), 10.0);
        assert_eq!(percentile(&shuffled, 50.0), 20.0);
    }

    #[test]
    fn step_returns_are_percent_changes() {
        let balances = [100.0, 110.0, 99.0];
        let returns = step_returns(&balances);
        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 10.0).abs() < 1e-12);
        assert!((returns[1] + 10.0).abs() < 1e-12);
    }
}
