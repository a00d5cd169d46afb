//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! The engine knows nothing about the problem it searches: a problem
//! implements [`AnnealingProblem`] and scores configurations with a type
//! implementing [`Criteria`]. [`Annealer`] can be driven one step at a time
//! or run to completion.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;
mod types;

pub use config::{ConfigError, SaConfig};
pub use runner::{Annealer, SaResult, SaRunner, StepEvent, StopReason};
pub use types::{AnnealingProblem, Criteria};
