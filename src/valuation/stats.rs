// Normal-distribution helpers and the two-team category win probability.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StatsError {
    #[error("standard deviation must be finite and > 0, got {0}")]
    NonPositiveSd(f64),
}

// Abramowitz & Stegun 7.1.26 coefficients (|error| <= 1.5e-7 on erf).
const ERF_P: f64 = 0.327_591_1;
const ERF_A1: f64 = 0.254_829_592;
const ERF_A2: f64 = -0.284_496_736;
const ERF_A3: f64 = 1.421_413_741;
const ERF_A4: f64 = -1.453_152_027;
const ERF_A5: f64 = 1.061_405_429;

/// Upper tail `1 - Φ(x)` for `x >= 0`.
fn upper_tail(x: f64) -> f64 {
    let u = x / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + ERF_P * u);
    let poly = t * (ERF_A1 + t * (ERF_A2 + t * (ERF_A3 + t * (ERF_A4 + t * ERF_A5))));
    0.5 * poly * (-u * u).exp()
}

/// Standard normal cumulative distribution function.
///
/// Evaluated on `|x|` and mirrored through `Φ(-x) = 1 - Φ(x)`, so the result
/// is exactly 0.5 at the mean and symmetric to rounding everywhere else.
pub fn normal_cdf(x: f64) -> f64 {
    if x == 0.0 {
        return 0.5;
    }
    let tail = upper_tail(x.abs());
    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Probability that `my_mean` beats `opp_mean` in a single weekly matchup.
///
/// Both sides are modelled as normal with the same variance `sd²`, so the
/// differential is `N(my_mean - opp_mean, 2·sd²)`. For lower-is-better
/// categories the operands are swapped.
pub fn win_probability(
    my_mean: f64,
    opp_mean: f64,
    sd: f64,
    lower_is_better: bool,
) -> Result<f64, StatsError> {
    if !(sd.is_finite() && sd > 0.0) {
        return Err(StatsError::NonPositiveSd(sd));
    }
    let diff = if lower_is_better {
        opp_mean - my_mean
    } else {
        my_mean - opp_mean
    };
    Ok(normal_cdf(diff / (sd * std::f64::consts::SQRT_2)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn cdf_at_zero_is_half() {
        assert_eq!(normal_cdf(0.0), 0.5);
    }

    #[test]
    fn cdf_known_values() {
        // Reference values from standard normal tables.
        let table = [
            (1.0, 0.841_344_746),
            (1.96, 0.975_002_105),
            (-1.0, 0.158_655_254),
            (2.5, 0.993_790_335),
            (-3.0, 0.001_349_898),
            (0.5, 0.691_462_461),
        ];
        for (x, expected) in table {
            let got = normal_cdf(x);
            assert!(
                approx_eq(got, expected, 2e-7),
                "Φ({x}) = {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn cdf_is_symmetric() {
        for i in 1..=80 {
            let x = i as f64 * 0.1;
            assert!(approx_eq(normal_cdf(-x), 1.0 - normal_cdf(x), 1e-12));
        }
    }

    #[test]
    fn cdf_strictly_increasing() {
        let mut prev = normal_cdf(-6.0);
        for i in 1..=120 {
            let x = -6.0 + i as f64 * 0.1;
            let cur = normal_cdf(x);
            assert!(cur > prev, "Φ not increasing at {x}: {prev} -> {cur}");
            prev = cur;
        }
    }

    #[test]
    fn cdf_stays_in_unit_interval() {
        for x in [-40.0, -8.0, 8.0, 40.0] {
            let p = normal_cdf(x);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn equal_means_give_even_odds() {
        for sd in [0.04, 1.0, 6.03, 250.0] {
            assert_eq!(win_probability(28.96, 28.96, sd, false).unwrap(), 0.5);
            assert_eq!(win_probability(3.79, 3.79, sd, true).unwrap(), 0.5);
        }
    }

    #[test]
    fn lower_is_better_mirrors_operands() {
        let cases = [(50.4, 50.11, 7.45), (3.2, 3.79, 1.31), (0.0, 10.0, 2.0)];
        for (a, b, sd) in cases {
            assert_eq!(
                win_probability(a, b, sd, true).unwrap(),
                win_probability(b, a, sd, false).unwrap()
            );
        }
    }

    #[test]
    fn higher_mean_wins_more_often() {
        let p = win_probability(30.0, 28.96, 6.03, false).unwrap();
        assert!(p > 0.5);
        let q = win_probability(30.0, 28.96, 6.03, true).unwrap();
        assert!(q < 0.5);
        assert!(approx_eq(p + q, 1.0, 1e-12));
    }

    #[test]
    fn one_sd_gap_matches_closed_form() {
        // (m - o) / (sd * sqrt 2) = 1/sqrt 2
        let p = win_probability(1.0, 0.0, 1.0, false).unwrap();
        assert!(approx_eq(p, 0.760_249_939, 2e-7));
    }

    #[test]
    fn rejects_non_positive_sd() {
        assert_eq!(
            win_probability(1.0, 0.0, 0.0, false),
            Err(StatsError::NonPositiveSd(0.0))
        );
        assert!(win_probability(1.0, 0.0, -2.0, false).is_err());
        assert!(win_probability(1.0, 0.0, f64::NAN, true).is_err());
    }
}
