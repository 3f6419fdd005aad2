//! Rank comparison of two empirical distributions.

use std::cmp::Ordering;

use txr_common::{Error, Result};

/// Probability that a random draw from `v1` is greater than or equal to a
/// random draw from `v2`.
///
/// Both inputs are sorted and merged with a single monotone cursor, so the
/// cost is dominated by the sorts. Ties count in favour of `v1`. NaN never
/// compares greater or equal; NaN values of either sign sort last, so they
/// only shrink the count and never hide finite values.
pub fn probability_greater_equal(v1: &[f64], v2: &[f64]) -> Result<f64> {
    if v1.is_empty() {
        return Err(Error::EmptySequence {
            name: "v1".to_string(),
        });
    }
    if v2.is_empty() {
        return Err(Error::EmptySequence {
            name: "v2".to_string(),
        });
    }

    let mut a = v1.to_vec();
    let mut b = v2.to_vec();
    a.sort_unstable_by(nan_last);
    b.sort_unstable_by(nan_last);

    let mut cursor = 0usize;
    let mut count: u128 = 0;
    for x in a.iter().take_while(|x| !x.is_nan()) {
        while cursor < b.len() && b[cursor] <= *x {
            cursor += 1;
        }
        count += cursor as u128;
    }

    Ok(count as f64 / (a.len() as f64 * b.len() as f64))
}

/// `total_cmp` puts negative NaN (as produced by `0.0 / 0.0`) before -inf.
fn nan_last(x: &f64, y: &f64) -> Ordering {
    x.is_nan().cmp(&y.is_nan()).then(x.total_cmp(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricSet;
    use txr_common::ConfusionCounts;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn brute_force(v1: &[f64], v2: &[f64]) -> f64 {
        let hits = v1
            .iter()
            .flat_map(|x| v2.iter().map(move |y| x >= y))
            .filter(|&ge| ge)
            .count();
        hits as f64 / (v1.len() * v2.len()) as f64
    }

    #[test]
    fn dominating_sample() {
        let p = probability_greater_equal(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(p, 1.0);
    }

    #[test]
    fn identical_samples_count_ties() {
        let p = probability_greater_equal(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((p - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn dominated_sample() {
        let p = probability_greater_equal(&[0.0, 0.5], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(p, 0.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = probability_greater_equal(&[3.0, 1.0, 2.0], &[2.5, 0.5]).unwrap();
        let b = probability_greater_equal(&[1.0, 2.0, 3.0], &[0.5, 2.5]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_inputs_fail() {
        let err = probability_greater_equal(&[], &[1.0]).unwrap_err();
        assert!(matches!(err, Error::EmptySequence { ref name } if name == "v1"));
        let err = probability_greater_equal(&[1.0], &[]).unwrap_err();
        assert!(matches!(err, Error::EmptySequence { ref name } if name == "v2"));
    }

    #[test]
    fn agrees_with_brute_force_on_random_vectors() {
        let mut rng = StdRng::seed_from_u64(2024);
        let shapes: [(usize, usize, f64); 6] = [
            (1, 1, 1.0),
            (7, 13, 10.0),
            (50, 3, 1.0),
            (200, 150, 100.0),
            (31, 64, 0.01),
            (500, 499, 1.0),
        ];
        for (n, m, scale) in shapes {
            let v1: Vec<f64> = (0..n).map(|_| rng.random::<f64>() * scale).collect();
            let v2: Vec<f64> = (0..m).map(|_| rng.random::<f64>() * scale - scale / 4.0).collect();
            let fast = probability_greater_equal(&v1, &v2).unwrap();
            assert_eq!(fast, brute_force(&v1, &v2), "n={} m={}", n, m);
        }
    }

    #[test]
    fn agrees_with_brute_force_on_heavy_ties() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            let v1: Vec<f64> = (0..40).map(|_| rng.random_range(0..5) as f64).collect();
            let v2: Vec<f64> = (0..25).map(|_| rng.random_range(0..5) as f64).collect();
            let fast = probability_greater_equal(&v1, &v2).unwrap();
            assert_eq!(fast, brute_force(&v1, &v2));
        }
    }

    #[test]
    fn degenerate_ppv_does_not_hide_finite_values() {
        // TP + FP = 0 in the first trial gives PPV = 0/0.
        let set = MetricSet::from_counts([
            ConfusionCounts::new(0, 60, 0, 40),
            ConfusionCounts::new(5, 60, 0, 35),
        ]);
        assert!(set.ppv[0].is_nan());
        assert_eq!(set.ppv[1], 1.0);

        let p = probability_greater_equal(&[1.0], &set.ppv).unwrap();
        assert_eq!(p, 0.5);
        let p = probability_greater_equal(&set.ppv, &[1.0]).unwrap();
        assert_eq!(p, 0.5);
        let p = probability_greater_equal(&set.ppv, &set.ppv).unwrap();
        assert_eq!(p, 0.25);
    }

    #[test]
    fn nan_of_either_sign_matches_brute_force() {
        let neg_nan = -f64::NAN;
        let v1 = [0.3, neg_nan, 0.9, f64::NAN, 0.5];
        let v2 = [neg_nan, 0.4, f64::NAN, 0.1, 0.9];
        let p = probability_greater_equal(&v1, &v2).unwrap();
        assert_eq!(p, brute_force(&v1, &v2));
        assert_eq!(p, 6.0 / 25.0);
    }
}
