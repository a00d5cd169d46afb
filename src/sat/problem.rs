//! MaxWSAT as an annealing problem.

use rand::Rng;

use super::assignment::Assignment;
use super::criteria::{SatCriteria, ScoreScale};
use super::evaluator::Evaluator;
use super::instance::Instance;
use crate::sa::AnnealingProblem;

/// Adapter exposing an [`Instance`] to the annealing engine.
///
/// Neighbors differ from their origin in exactly one variable. Evaluation
/// goes through an [`Evaluator`] that is advanced to each requested
/// assignment, so evaluating a neighbor of the last evaluated assignment
/// costs O(degree) flips instead of a full rescan.
///
/// # Examples
///
/// ```
/// use u_maxwsat::random::RandomSource;
/// use u_maxwsat::sa::{AnnealingProblem, Criteria};
/// use u_maxwsat::sat::{Assignment, Instance, SatProblem};
///
/// let instance = Instance::new(&[vec![1, 2], vec![-1]], &[4, 1]).unwrap();
/// let mut problem = SatProblem::new(&instance);
/// let criteria = problem.evaluate(&Assignment::from_bools(&[false, true]));
/// assert!(criteria.is_valid());
/// assert_eq!(criteria.weight(), 1);
///
/// let mut rng = RandomSource::from_seed(1);
/// let start = Assignment::all_false(2);
/// let neighbor = problem.random_neighbor(&start, &mut rng);
/// assert_eq!(neighbor.hamming_distance(&start), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SatProblem<'a> {
    evaluator: Evaluator<'a>,
    scale: ScoreScale,
}

impl<'a> SatProblem<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            evaluator: Evaluator::new(instance),
            scale: ScoreScale::of(instance),
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.evaluator.instance()
    }

    /// The evaluator, positioned at the last evaluated assignment.
    pub fn evaluator(&self) -> &Evaluator<'a> {
        &self.evaluator
    }

    pub fn scale(&self) -> ScoreScale {
        self.scale
    }
}

impl AnnealingProblem for SatProblem<'_> {
    type Configuration = Assignment;
    type Criteria = SatCriteria;

    fn random_configuration<R: Rng>(&mut self, rng: &mut R) -> Assignment {
        Assignment::random(self.instance().variable_count(), rng)
    }

    fn random_neighbor<R: Rng>(&mut self, configuration: &Assignment, rng: &mut R) -> Assignment {
        let mut neighbor = configuration.clone();
        // modulo bias is negligible for realistic variable counts
        let id = (rng.next_u64() % neighbor.len() as u64) as usize + 1;
        neighbor.flip(id);
        neighbor
    }

    fn evaluate(&mut self, configuration: &Assignment) -> SatCriteria {
        let evaluated = self.evaluator.advance_to(configuration);
        SatCriteria::of(evaluated, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSource;
    use crate::sa::{Annealer, Criteria, SaConfig};
    use crate::sat::instance::tests::example_instance;

    #[test]
    fn test_evaluate_example_assignments() {
        let instance = example_instance();
        let mut problem = SatProblem::new(&instance);

        let criteria = problem.evaluate(&Assignment::all_false(4));
        assert_eq!((criteria.satisfied_count(), criteria.weight()), (5, 0));
        assert!(!criteria.is_valid());

        let criteria = problem.evaluate(&Assignment::from_bools(&[true, false, false, true]));
        assert_eq!((criteria.satisfied_count(), criteria.weight()), (6, 8));
        assert!(criteria.is_valid());

        let criteria = problem.evaluate(&Assignment::all_true(4));
        assert_eq!((criteria.satisfied_count(), criteria.weight()), (5, 13));
    }

    #[test]
    fn test_neighbors_flip_one_variable() {
        let instance = example_instance();
        let mut problem = SatProblem::new(&instance);
        let mut rng = RandomSource::from_seed(17);
        let start = problem.random_configuration(&mut rng);
        assert_eq!(start.len(), 4);

        let mut seen = [false; 5];
        for _ in 0..200 {
            let neighbor = problem.random_neighbor(&start, &mut rng);
            let diff: Vec<usize> = start.differing_ids(&neighbor).collect();
            assert_eq!(diff.len(), 1);
            seen[diff[0]] = true;
        }
        assert_eq!(seen, [false, true, true, true, true]);
    }

    #[test]
    fn test_evaluation_tracks_random_walk() {
        let instance = example_instance();
        let mut problem = SatProblem::new(&instance);
        let mut rng = RandomSource::from_seed(99);
        let mut current = problem.random_configuration(&mut rng);
        for _ in 0..500 {
            let candidate = problem.random_neighbor(&current, &mut rng);
            let criteria = problem.evaluate(&candidate);
            assert_eq!(criteria.satisfied_count(), instance.count_satisfied(&candidate));
            assert_eq!(criteria.weight(), instance.weight_of(&candidate));
            if rng.next_unit() < 0.5 {
                current = candidate;
            }
        }
    }

    #[test]
    fn test_annealing_never_rebuilds_after_start() {
        let instance = example_instance();
        let config = SaConfig::default().with_max_total_steps(1000);
        let mut annealer =
            Annealer::new(SatProblem::new(&instance), config, RandomSource::from_seed(3)).unwrap();
        let result = annealer.run_to_completion();

        assert_eq!(result.iterations, 1000);
        assert!(result.accepted_moves < result.iterations);
        assert_eq!(annealer.problem().evaluator().rebuild_count(), 1);
    }
}
