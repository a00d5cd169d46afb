//! Core traits for Simulated Annealing.

use rand::Rng;

/// Comparable quality of an evaluated configuration.
///
/// Implementations must make [`worse_than`](Criteria::worse_than)
/// reflexive-zero (`x.worse_than(&x) == 0`) and antisymmetric
/// (`a.worse_than(&b) == -b.worse_than(&a)`).
pub trait Criteria: Clone {
    /// Whether the configuration satisfies every hard constraint.
    fn is_valid(&self) -> bool;

    /// How much worse `self` is than `other`. Positive when `other` is
    /// better, negative when `self` is better, zero when equivalent.
    ///
    /// The magnitude is the Δ fed into the Metropolis rule
    /// `exp(-Δ / temperature)`.
    fn worse_than(&self, other: &Self) -> f64;

    /// `self` is at least as good as `other`.
    fn is_better_or_equal(&self, other: &Self) -> bool {
        self.worse_than(other) <= 0.0
    }
}

/// Defines a problem the annealing engine can search.
///
/// The engine asks for a starting configuration, for random neighbors of
/// its current configuration, and for evaluations of candidates. It
/// handles temperature, acceptance and stopping.
///
/// Methods take `&mut self` so that an implementation can keep incremental
/// evaluation state between calls.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_maxwsat::sa::{AnnealingProblem, Criteria};
///
/// #[derive(Clone)]
/// struct Distance(i64);
///
/// impl Criteria for Distance {
///     fn is_valid(&self) -> bool {
///         true
///     }
///     fn worse_than(&self, other: &Self) -> f64 {
///         (self.0 - other.0) as f64
///     }
/// }
///
/// /// Walk the integers towards 0.
/// struct Walk;
///
/// impl AnnealingProblem for Walk {
///     type Configuration = i64;
///     type Criteria = Distance;
///
///     fn random_configuration<R: Rng>(&mut self, rng: &mut R) -> i64 {
///         rng.random_range(-100..100)
///     }
///     fn random_neighbor<R: Rng>(&mut self, x: &i64, rng: &mut R) -> i64 {
///         if rng.random_range(0..2) == 0 { x - 1 } else { x + 1 }
///     }
///     fn evaluate(&mut self, x: &i64) -> Distance {
///         Distance(x.abs())
///     }
/// }
/// ```
pub trait AnnealingProblem {
    /// The configuration (solution) representation.
    type Configuration: Clone;

    /// The evaluation of a configuration.
    type Criteria: Criteria;

    /// Creates a random starting configuration.
    fn random_configuration<R: Rng>(&mut self, rng: &mut R) -> Self::Configuration;

    /// Creates a random neighbor of `configuration`.
    fn random_neighbor<R: Rng>(
        &mut self,
        configuration: &Self::Configuration,
        rng: &mut R,
    ) -> Self::Configuration;

    /// Evaluates a configuration.
    fn evaluate(&mut self, configuration: &Self::Configuration) -> Self::Criteria;
}
