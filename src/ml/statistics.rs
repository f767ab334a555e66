//! Summary statistics for building canonical scenarios

use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Median of the values; the mean of the two middle values for even counts
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted: Vec<OrderedFloat<f64>> = values.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1].0 + sorted[mid].0) / 2.0)
    } else {
        Some(sorted[mid].0)
    }
}

/// Most frequent value; ties go to the smallest value
pub fn mode(values: &[i64]) -> Option<i64> {
    values
        .iter()
        .copied()
        .counts()
        .into_iter()
        .max_by_key(|&(value, count)| (count, Reverse(value)))
        .map(|(value, _)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], None)]
    #[case(&[7.0], Some(7.0))]
    #[case(&[90.0, 100.0, 95.0], Some(95.0))]
    #[case(&[500.0, 600.0, 550.0, 700.0], Some(575.0))]
    #[case(&[-2.0, 4.0], Some(1.0))]
    fn test_median(#[case] values: &[f64], #[case] expected: Option<f64>) {
        assert_eq!(median(values), expected);
    }

    #[rstest]
    #[case(&[], None)]
    #[case(&[3], Some(3))]
    #[case(&[1, 2, 2, 3], Some(2))]
    #[case(&[5, 4, 5, 4], Some(4))]
    #[case(&[9, 1, 9, 1, 1], Some(1))]
    fn test_mode(#[case] values: &[i64], #[case] expected: Option<i64>) {
        assert_eq!(mode(values), expected);
    }
}
