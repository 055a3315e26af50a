use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub n: i64,
    pub reported_margin: f64,
    pub p_value: f64,
}

/// Simplified Kaplan-Markov p-value for a hand-counted sample:
/// `min(1, exp(-2 * n * margin^2))` with `n` the sample size.
///
/// This is the illustrative bound, not the sequential test used in real
/// risk-limiting audits.
pub fn kaplan_markov_p_value(
    sampled_winner_votes: i64,
    sampled_loser_votes: i64,
    reported_margin: f64,
) -> Result<AuditResult> {
    let n = sampled_winner_votes.saturating_add(sampled_loser_votes);
    if n <= 0 || !(reported_margin > 0.0) {
        return Err(Error::InvalidArgument(
            "sample size and margin must be > 0".to_string(),
        ));
    }
    let p_value = (-2.0 * n as f64 * reported_margin.powi(2)).exp().min(1.0);
    Ok(AuditResult {
        n,
        reported_margin,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_sample_or_margin() {
        for (winner, loser, margin) in [(0, 0, 0.1), (5, -5, 0.1), (10, 2, 0.0), (10, 2, -0.3)] {
            assert!(matches!(
                kaplan_markov_p_value(winner, loser, margin),
                Err(Error::InvalidArgument(_))
            ));
        }
        assert!(kaplan_markov_p_value(1, 1, f64::NAN).is_err());
    }

    #[test]
    fn p_value_in_unit_interval() {
        let result = kaplan_markov_p_value(50, 10, 0.2).unwrap();
        assert_eq!(result.n, 60);
        assert!((0.0..=1.0).contains(&result.p_value));
        assert!((result.p_value - (-4.8f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn shrinks_with_sample_size() {
        let small = kaplan_markov_p_value(5, 5, 0.05).unwrap().p_value;
        let large = kaplan_markov_p_value(500, 500, 0.05).unwrap().p_value;
        assert!(large < small);
        assert!(small <= 1.0);
    }
}
