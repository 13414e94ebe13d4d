//! Random sampling helpers for the cosmetic noise in scores and metrics.
//!
//! All randomness in the pipeline flows through an injected [`Rng`], so a
//! seeded generator reproduces a session exactly. These helpers tolerate
//! degenerate ranges (configured as zero-width) instead of panicking.

use rand::Rng;

/// Uniform draw from `[lo, hi)`. Returns `lo` when the range is empty or
/// either bound is not finite.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if lo.is_finite() && hi.is_finite() && hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Uniform integer draw from `[lo, hi]`. Returns `lo` when `hi <= lo`.
pub fn uniform_inclusive<R: Rng + ?Sized>(rng: &mut R, lo: u32, hi: u32) -> u32 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

/// Round to a fixed number of decimal places.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn uniform_stays_in_half_open_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let v = uniform(&mut rng, 20.0, 80.0);
            assert!((20.0..80.0).contains(&v));
        }
    }

    #[test]
    fn empty_ranges_collapse_to_lower_bound() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!((uniform(&mut rng, 0.0, 0.0)).abs() < f64::EPSILON);
        assert_eq!(uniform_inclusive(&mut rng, 40, 40), 40);
        assert_eq!(uniform_inclusive(&mut rng, 50, 10), 50);
    }

    #[test]
    fn non_finite_bounds_do_not_sample() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!((uniform(&mut rng, 0.0, f64::INFINITY)).abs() < f64::EPSILON);
        assert!(uniform(&mut rng, f64::NAN, 1.0).is_nan());
        assert!((uniform(&mut rng, 20.0, f64::NAN) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn inclusive_range_hits_both_ends() {
        let mut rng = StdRng::seed_from_u64(3);
        let draws: Vec<u32> = (0..2000).map(|_| uniform_inclusive(&mut rng, 1, 3)).collect();
        assert!(draws.contains(&1));
        assert!(draws.contains(&3));
        assert!(draws.iter().all(|d| (1..=3).contains(d)));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert!((round_to(0.456, 2) - 0.46).abs() < 1e-12);
        assert!((round_to(47.25, 1) - 47.3).abs() < 1e-9);
        assert!((round_to(0.5, 0) - 1.0).abs() < f64::EPSILON);
    }
}
