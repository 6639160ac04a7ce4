// =============================================================================
// Verdict Aggregator — signed attributions to a directional call
// =============================================================================
//
// Pure function over the attribution vector; it knows nothing about where the
// vector came from, so synthetic vectors exercise every branch in tests.
//
// Thresholds (exclusive boundaries):
//   net_strength >  0.2  => increase (high above 0.5, else medium)
//   net_strength < -0.2  => decrease (high below -0.5, else medium)
//   otherwise            => neutral / low
// =============================================================================

use serde::Serialize;

use crate::types::{Confidence, Verdict};

/// Net directional read of one attribution vector.
#[derive(Debug, Clone, Serialize)]
pub struct DirectionalVerdict {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub net_strength: f64,
}

/// Partition attributions by sign, sum magnitudes, and derive the verdict.
pub fn aggregate(attributions: &[f64]) -> DirectionalVerdict {
    let total_positive: f64 = attributions.iter().filter(|v| **v > 0.0).sum();
    let total_negative: f64 = attributions
        .iter()
        .filter(|v| **v < 0.0)
        .map(|v| v.abs())
        .sum();

    let net_strength = total_positive - total_negative;

    let (verdict, confidence) = if net_strength > 0.2 {
        (
            Verdict::Increase,
            if net_strength > 0.5 {
                Confidence::High
            } else {
                Confidence::Medium
            },
        )
    } else if net_strength < -0.2 {
        (
            Verdict::Decrease,
            if net_strength < -0.5 {
                Confidence::High
            } else {
                Confidence::Medium
            },
        )
    } else {
        (Verdict::Neutral, Confidence::Low)
    };

    DirectionalVerdict {
        verdict,
        confidence,
        net_strength,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::explanation;

    #[test]
    fn strong_positive_is_increase_high() {
        let v = aggregate(&[0.4, 0.3, -0.1]); // net = 0.6
        assert_eq!(v.verdict, Verdict::Increase);
        assert_eq!(v.confidence, Confidence::High);
        assert!((v.net_strength - 0.6).abs() < 1e-12);
    }

    #[test]
    fn moderate_positive_is_increase_medium() {
        let v = aggregate(&[0.5, -0.2]); // net = 0.3
        assert_eq!(v.verdict, Verdict::Increase);
        assert_eq!(v.confidence, Confidence::Medium);
    }

    #[test]
    fn boundary_is_exclusive() {
        // Exactly 0.2 is NOT an increase.
        let v = aggregate(&[0.2]);
        assert_eq!(v.verdict, Verdict::Neutral);
        assert_eq!(v.confidence, Confidence::Low);

        let v = aggregate(&[-0.2]);
        assert_eq!(v.verdict, Verdict::Neutral);
    }

    #[test]
    fn strong_negative_is_decrease_high() {
        let v = aggregate(&[-0.3, -0.25]); // net = -0.55
        assert_eq!(v.verdict, Verdict::Decrease);
        assert_eq!(v.confidence, Confidence::High);
        assert!((v.net_strength + 0.55).abs() < 1e-12);
    }

    #[test]
    fn empty_vector_is_neutral() {
        let v = aggregate(&[]);
        assert_eq!(v.verdict, Verdict::Neutral);
        assert_eq!(v.net_strength, 0.0);
    }

    #[test]
    fn zeros_do_not_count_to_either_side() {
        let v = aggregate(&[0.0, 0.0, 0.3]);
        assert!((v.net_strength - 0.3).abs() < 1e-12);
    }

    #[test]
    fn ranker_round_trip_reproduces_net_strength() {
        // Summing the ranked signed impacts must land on the same
        // net_strength the aggregator computes independently.
        let impacts = [0.25, -0.4, 0.1, 0.0, -0.05, 0.3];
        let schema = ["a", "b", "c", "d", "e", "f"];
        let values = [1.0; 6];

        let ranked = explanation::rank(&schema, &values, &impacts);
        let signed_sum: f64 = ranked.iter().map(|r| r.impact).sum();

        let v = aggregate(&impacts);
        assert!((signed_sum - v.net_strength).abs() < 1e-12);
    }
}
