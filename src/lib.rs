//! Maximum Weighted SAT by simulated annealing.
//!
//! - [`sat`]: the MaxWSAT model. Instances, assignments, an incremental
//!   evaluator with O(degree) flips, the scoring policy, and a parser for
//!   the weighted DIMACS (`mwcnf`) format.
//! - [`sa`]: a generic, steppable simulated annealing engine.
//! - [`random`]: the seedable random source driving both.
//!
//! # Example
//!
//! ```
//! use u_maxwsat::random::RandomSource;
//! use u_maxwsat::sa::{Criteria, SaConfig, SaRunner};
//! use u_maxwsat::sat::{parse_mwcnf_str, Instance, SatProblem};
//!
//! let parsed = parse_mwcnf_str("p mwcnf 3 2\nw 3 1 2 0\n1 -2 0\n-1 3 0\n").unwrap();
//! let instance = Instance::try_from(parsed).unwrap();
//!
//! let config = SaConfig::default().with_max_total_steps(1_000);
//! let result = SaRunner::run(SatProblem::new(&instance), &config, RandomSource::from_seed(7)).unwrap();
//! assert!(result.best_criteria.is_valid());
//! assert_eq!(result.best_criteria.weight(), 6);
//! ```

pub mod random;
pub mod sa;
pub mod sat;
