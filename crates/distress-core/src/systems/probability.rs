//! Probability Functions
//!
//! Pure curves mapping node counters to probabilities, plus the Bernoulli
//! draw every stochastic rule goes through.

use rand::Rng;

/// Bernoulli trial: a uniform draw in [0, 1) falls below `p`.
///
/// Always consumes exactly one draw, so `p == 0.0` never fires and
/// `p >= 1.0` always fires.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Fatigue multiplier: `rate ^ cycle`. Equals 1 at cycle 0.
pub fn willingness(rate: f64, cycle: u32) -> f64 {
    rate.powf(f64::from(cycle))
}

/// Probability of dropping the app after `app_count` steps of use.
///
/// `1 - sigmoid(app_count / 3)`: 0.5 at zero, falling toward 0 with use.
pub fn consistency(app_count: u32) -> f64 {
    1.0 - 1.0 / (1.0 + (-(f64::from(app_count) / 3.0)).exp())
}

/// Local persuasion (liking): sigmoid in trust-list size, midpoint at 4.
pub fn local_liking(max_rate: f64, trust_size: usize) -> f64 {
    max_rate / (1.0 + (-(trust_size as f64 - 4.0)).exp())
}

/// Global persuasion (social proof): linear in the app-user fraction.
pub fn global_proof(max_rate: f64, app_fraction: f64) -> f64 {
    max_rate * app_fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_willingness_starts_at_one() {
        assert_eq!(willingness(0.8, 0), 1.0);
        assert!((willingness(0.8, 2) - 0.64).abs() < EPS);
    }

    #[test]
    fn test_willingness_strictly_decreasing() {
        for rate in [0.1, 0.5, 0.8, 0.99] {
            let mut previous = willingness(rate, 0);
            for cycle in 1..60 {
                let current = willingness(rate, cycle);
                assert!(current < previous, "rate={rate} cycle={cycle}");
                previous = current;
            }
        }
    }

    #[test]
    fn test_consistency_shape() {
        assert_eq!(consistency(0), 0.5);
        assert!(consistency(3) > consistency(30));
        assert!(consistency(300) < 0.001);
        assert!(consistency(300) >= 0.0);
    }

    #[test]
    fn test_local_liking_midpoint() {
        assert!((local_liking(0.05, 4) - 0.025).abs() < EPS);
        assert!(local_liking(0.05, 0) < 0.001);
        assert!(local_liking(0.05, 40) > 0.0499);
    }

    #[test]
    fn test_global_proof_linear() {
        assert_eq!(global_proof(0.02, 0.0), 0.0);
        assert!((global_proof(0.02, 0.5) - 0.01).abs() < EPS);
        assert!((global_proof(0.02, 1.0) - 0.02).abs() < EPS);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert!((0..1000).all(|_| !chance(&mut rng, 0.0)));
        assert!((0..1000).all(|_| chance(&mut rng, 1.0)));
    }

    #[test]
    fn test_chance_rate() {
        let mut rng = SmallRng::seed_from_u64(5);
        let hits = (0..20_000).filter(|_| chance(&mut rng, 0.25)).count();
        assert!((4_500..5_500).contains(&hits), "hits={hits}");
    }
}
