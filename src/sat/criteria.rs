//! Scoring of evaluated assignments.
//!
//! A configuration is valid when every clause is satisfied. Comparison is
//! split on validity:
//!
//! | self    | other   | `self.worse_than(other)`                      |
//! |---------|---------|-----------------------------------------------|
//! | valid   | valid   | `w(other) - w(self)`                          |
//! | invalid | invalid | `r(other) - r(self)`                          |
//! | mixed   |         | `standing(other) - standing(self)`            |
//!
//! where `w` is the weight normalized by the sum of absolute weights, `r` is
//! the satisfied-clause ratio, and `standing` is `w` for a valid
//! configuration and `w * r - 2` for an invalid one. Normalized weights lie
//! in `[-1, 1]` and `r < 1` for invalid configurations, so every invalid
//! standing is below every valid one. Each branch is a difference of one
//! expression evaluated on both sides, which makes the function
//! antisymmetric and zero on equal inputs.

use std::cmp::Ordering;
use std::fmt;

use super::evaluator::EvaluatedConfig;
use super::instance::Instance;
use crate::sa::Criteria;

const INFEASIBLE_OFFSET: f64 = 2.0;

/// Instance totals used for normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreScale {
    clause_count: usize,
    weight_scale: i64,
}

impl ScoreScale {
    /// # Panics
    ///
    /// Panics if `clause_count` is 0 or `weight_scale` is not positive.
    pub fn new(clause_count: usize, weight_scale: i64) -> Self {
        assert!(clause_count > 0, "score scale needs at least one clause");
        assert!(weight_scale > 0, "weight scale must be positive");
        Self {
            clause_count,
            weight_scale,
        }
    }

    pub fn of(instance: &Instance) -> Self {
        Self::new(instance.clause_count(), instance.weight_scale())
    }

    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    pub fn weight_scale(&self) -> i64 {
        self.weight_scale
    }
}

/// Satisfied-clause count and weight of one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatCriteria {
    satisfied_count: usize,
    weight: i64,
    scale: ScoreScale,
}

impl SatCriteria {
    pub fn new(satisfied_count: usize, weight: i64, scale: ScoreScale) -> Self {
        debug_assert!(satisfied_count <= scale.clause_count);
        Self {
            satisfied_count,
            weight,
            scale,
        }
    }

    pub fn of(evaluated: &EvaluatedConfig, scale: ScoreScale) -> Self {
        Self::new(evaluated.satisfied_count(), evaluated.weight(), scale)
    }

    pub fn satisfied_count(&self) -> usize {
        self.satisfied_count
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn scale(&self) -> ScoreScale {
        self.scale
    }

    /// Every clause is satisfied.
    pub fn is_satisfied(&self) -> bool {
        self.satisfied_count == self.scale.clause_count
    }

    pub fn satisfied_ratio(&self) -> f64 {
        self.satisfied_count as f64 / self.scale.clause_count as f64
    }

    pub fn normalized_weight(&self) -> f64 {
        self.weight as f64 / self.scale.weight_scale as f64
    }

    fn standing(&self) -> f64 {
        if self.is_satisfied() {
            self.normalized_weight()
        } else {
            self.normalized_weight() * self.satisfied_ratio() - INFEASIBLE_OFFSET
        }
    }

    /// Total order derived from [`Criteria::worse_than`]; `Greater` means
    /// `self` is better.
    pub fn compare(&self, other: &Self) -> Ordering {
        let worseness = self.worse_than(other);
        if worseness > 0.0 {
            Ordering::Less
        } else if worseness < 0.0 {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl Criteria for SatCriteria {
    fn is_valid(&self) -> bool {
        self.is_satisfied()
    }

    fn worse_than(&self, other: &Self) -> f64 {
        match (self.is_satisfied(), other.is_satisfied()) {
            (true, true) => other.normalized_weight() - self.normalized_weight(),
            (false, false) => other.satisfied_ratio() - self.satisfied_ratio(),
            _ => other.standing() - self.standing(),
        }
    }
}

impl fmt::Display for SatCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SatCriteria(satisfied={}/{}, weight={}, valid={})",
            self.satisfied_count,
            self.scale.clause_count,
            self.weight,
            self.is_satisfied()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scale() -> ScoreScale {
        ScoreScale::new(6, 13)
    }

    fn criteria(satisfied: usize, weight: i64) -> SatCriteria {
        SatCriteria::new(satisfied, weight, scale())
    }

    #[test]
    fn test_both_valid_compares_weight() {
        let light = criteria(6, 6);
        let heavy = criteria(6, 8);
        assert!(light.worse_than(&heavy) > 0.0);
        assert!(heavy.worse_than(&light) < 0.0);
        assert!((light.worse_than(&heavy) - 2.0 / 13.0).abs() < 1e-12);
        assert_eq!(heavy.compare(&light), Ordering::Greater);
    }

    #[test]
    fn test_neither_valid_compares_satisfied() {
        let fewer = criteria(4, 13);
        let more = criteria(5, 0);
        assert!((fewer.worse_than(&more) - 1.0 / 6.0).abs() < 1e-12);
        assert!(more.is_better_or_equal(&fewer));
        assert!(!fewer.is_better_or_equal(&more));
    }

    #[test]
    fn test_valid_dominates_invalid() {
        // all variables true: 5 of 6 clauses, full weight
        let heavy_invalid = criteria(5, 13);
        let light_valid = criteria(6, 0);
        assert!(heavy_invalid.worse_than(&light_valid) > 0.0);
        assert!(light_valid.worse_than(&heavy_invalid) < 0.0);
        assert_eq!(light_valid.compare(&heavy_invalid), Ordering::Greater);
    }

    #[test]
    fn test_valid_dominates_with_negative_weights() {
        let scale = ScoreScale::new(2, 10);
        let worst_valid = SatCriteria::new(2, -10, scale);
        let best_invalid = SatCriteria::new(1, 10, scale);
        assert!(worst_valid.worse_than(&best_invalid) < 0.0);
    }

    #[test]
    fn test_equal_is_zero() {
        let x = criteria(5, 7);
        assert_eq!(x.worse_than(&x), 0.0);
        assert_eq!(x.compare(&x), Ordering::Equal);
        assert!(x.is_better_or_equal(&x));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            criteria(6, 8).to_string(),
            "SatCriteria(satisfied=6/6, weight=8, valid=true)"
        );
    }

    #[test]
    #[should_panic]
    fn test_zero_clause_scale_panics() {
        ScoreScale::new(0, 1);
    }

    fn any_criteria() -> impl Strategy<Value = SatCriteria> {
        (1usize..50, 1i64..1000).prop_flat_map(|(clauses, weight_scale)| {
            (0..=clauses, -weight_scale..=weight_scale).prop_map(move |(satisfied, weight)| {
                SatCriteria::new(satisfied, weight, ScoreScale::new(clauses, weight_scale))
            })
        })
    }

    fn pair() -> impl Strategy<Value = (SatCriteria, SatCriteria)> {
        (1usize..50, 1i64..1000).prop_flat_map(|(clauses, weight_scale)| {
            let one = move || {
                (0..=clauses, -weight_scale..=weight_scale).prop_map(move |(satisfied, weight)| {
                    SatCriteria::new(satisfied, weight, ScoreScale::new(clauses, weight_scale))
                })
            };
            (one(), one())
        })
    }

    proptest! {
        #[test]
        fn worse_than_self_is_zero(x in any_criteria()) {
            prop_assert_eq!(x.worse_than(&x), 0.0);
        }

        #[test]
        fn worse_than_is_antisymmetric((a, b) in pair()) {
            prop_assert_eq!(a.worse_than(&b), -b.worse_than(&a));
        }

        #[test]
        fn valid_beats_invalid((a, b) in pair()) {
            if a.is_valid() && !b.is_valid() {
                prop_assert!(a.worse_than(&b) < 0.0);
                prop_assert_eq!(a.compare(&b), Ordering::Greater);
            }
        }
    }
}
