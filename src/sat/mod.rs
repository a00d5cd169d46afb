//! Maximum Weighted SAT model and incremental evaluation.
//!
//! - [`Instance`]: immutable clauses over weighted variables.
//! - [`Assignment`]: one bit per variable, independent of any instance.
//! - [`Evaluator`]: live mirrors of an instance for one assignment,
//!   supporting O(degree) flips.
//! - [`SatCriteria`]: satisfied-clause count and weight with the
//!   validity-aware "how much worse" metric.
//! - [`SatProblem`]: adapter that lets the annealing engine search an
//!   instance.
//! - [`dimacs`]: parser for the `mwcnf` text format.
//!
//! Variables are identified by 1-based ids everywhere, matching the literal
//! encoding.

mod assignment;
mod criteria;
pub mod dimacs;
mod evaluator;
mod instance;
mod problem;
mod types;

pub use assignment::Assignment;
pub use criteria::{SatCriteria, ScoreScale};
pub use dimacs::{parse_mwcnf, parse_mwcnf_str, DimacsParseError, ParsedInstance};
pub use evaluator::{EvaluatedConfig, Evaluator, FlipDelta};
pub use instance::{Instance, InstanceError, Variable};
pub use problem::SatProblem;
pub use types::{Clause, Term, VarId};
