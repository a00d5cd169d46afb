//! SA execution: a steppable annealing engine.

use std::fmt;

use log::{debug, info, trace};
use rand::Rng;

use super::config::{ConfigError, SaConfig};
use super::types::{AnnealingProblem, Criteria};

/// Why a run froze. Conditions are checked in declaration order and the
/// first match is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The temperature reached the stop temperature.
    Temperature,
    /// The total step budget was used up.
    TotalSteps,
    /// Too many steps without an accepted move.
    NoChange,
    /// Too many steps without a new best valid configuration.
    NoBetterment,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Temperature => "temperature reached the stop temperature",
            StopReason::TotalSteps => "total step limit reached",
            StopReason::NoChange => "no accepted move within the limit",
            StopReason::NoBetterment => "no improvement of the best configuration within the limit",
        })
    }
}

/// What the most recent successful [`Annealer::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Equilibrium was complete and the temperature was lowered.
    Cooled,
    /// A candidate was evaluated and became the current configuration.
    Accepted,
    /// A candidate was evaluated and discarded.
    Rejected,
}

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaResult<C, K> {
    /// The best configuration found.
    pub best: C,

    /// Criteria of the best configuration. Check
    /// [`Criteria::is_valid`]: a run may never reach a valid configuration.
    pub best_criteria: K,

    /// Total number of search steps (neighbor evaluations).
    pub iterations: u64,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: u64,

    /// Number of moves strictly better than the configuration they replaced.
    pub improving_moves: u64,

    /// Number of times the temperature was lowered.
    pub cooling_ticks: u64,

    /// Why the run froze; `None` if it was still searching.
    pub stop_reason: Option<StopReason>,
}

/// Simulated annealing over an [`AnnealingProblem`].
///
/// The engine owns the problem, the random source and the search state:
/// current and best configurations with their criteria, the temperature,
/// and four counters (total steps, steps in the current equilibrium, steps
/// since the last accepted move, steps since the last new best).
///
/// Passing `&mut RandomSource` as `rng` keeps the generator with the caller.
///
/// # Examples
///
/// ```
/// use u_maxwsat::random::RandomSource;
/// use u_maxwsat::sa::{Annealer, Criteria, SaConfig};
/// use u_maxwsat::sat::{Instance, SatProblem};
///
/// let instance = Instance::new(&[vec![1, -3, 4], vec![-1, 2, -3], vec![3, 4]], &[2, 4, 1, 6]).unwrap();
/// let config = SaConfig::default().with_max_total_steps(2_000);
/// let mut rng = RandomSource::from_seed(42);
///
/// let mut annealer = Annealer::new(SatProblem::new(&instance), config, &mut rng).unwrap();
/// let result = annealer.run_to_completion();
/// assert!(result.best_criteria.is_valid());
/// ```
pub struct Annealer<P: AnnealingProblem, R: Rng> {
    problem: P,
    rng: R,
    config: SaConfig,

    current: P::Configuration,
    current_criteria: P::Criteria,
    best: P::Configuration,
    best_criteria: P::Criteria,
    temperature: f64,

    steps_total: u64,
    steps_in_equilibrium: u64,
    steps_since_change: u64,
    steps_since_betterment: u64,

    accepted_moves: u64,
    improving_moves: u64,
    cooling_ticks: u64,
    last_event: Option<StepEvent>,
}

impl<P: AnnealingProblem, R: Rng> Annealer<P, R> {
    /// Starts from a configuration drawn by the problem.
    pub fn new(mut problem: P, config: SaConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = problem.random_configuration(&mut rng);
        Self::with_start(problem, start, config, rng)
    }

    /// Starts from the given configuration.
    pub fn with_start(
        mut problem: P,
        start: P::Configuration,
        config: SaConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let criteria = problem.evaluate(&start);
        let temperature = config.initial_temperature;

        Ok(Self {
            problem,
            rng,
            config,
            best: start.clone(),
            best_criteria: criteria.clone(),
            current: start,
            current_criteria: criteria,
            temperature,
            steps_total: 0,
            steps_in_equilibrium: 0,
            steps_since_change: 0,
            steps_since_betterment: 0,
            accepted_moves: 0,
            improving_moves: 0,
            cooling_ticks: 0,
            last_event: None,
        })
    }

    /// The first stop condition that holds, if any.
    pub fn stop_reason(&self) -> Option<StopReason> {
        let reached = |limit: Option<u64>, value: u64| limit.is_some_and(|n| value >= n);

        if self.temperature <= self.config.stop_temperature {
            Some(StopReason::Temperature)
        } else if reached(self.config.max_total_steps, self.steps_total) {
            Some(StopReason::TotalSteps)
        } else if reached(self.config.max_steps_without_change, self.steps_since_change) {
            Some(StopReason::NoChange)
        } else if reached(
            self.config.max_steps_without_betterment,
            self.steps_since_betterment,
        ) {
            Some(StopReason::NoBetterment)
        } else {
            None
        }
    }

    /// Whether the run is over. Once true, it stays true: a frozen engine
    /// no longer changes its state.
    pub fn is_frozen(&self) -> bool {
        self.stop_reason().is_some()
    }

    /// Advances the search by one step. Returns `false` if the run is
    /// frozen.
    ///
    /// A step is either a cooling tick (when the equilibrium length has been
    /// reached) or one neighbor evaluation with Metropolis acceptance.
    pub fn step(&mut self) -> bool {
        if self.is_frozen() {
            return false;
        }

        if self.steps_in_equilibrium >= self.config.equilibrium_steps {
            self.temperature *= self.config.cooling_factor;
            self.steps_in_equilibrium = 0;
            self.cooling_ticks += 1;
            self.last_event = Some(StepEvent::Cooled);
            debug!(
                "cooled to temperature {:.6e} after {} steps",
                self.temperature, self.steps_total
            );
            self.log_if_frozen();
            return true;
        }

        self.steps_total += 1;
        self.steps_in_equilibrium += 1;
        self.steps_since_change += 1;
        self.steps_since_betterment += 1;

        let candidate = self.problem.random_neighbor(&self.current, &mut self.rng);
        let criteria = self.problem.evaluate(&candidate);
        let worseness = criteria.worse_than(&self.current_criteria);

        // Metropolis acceptance criterion
        let accept = if worseness <= 0.0 {
            if worseness < 0.0 {
                self.improving_moves += 1;
            }
            true
        } else {
            let probability = (-worseness / self.temperature).exp();
            self.rng.random_range(0.0..1.0) < probability
        };

        if accept {
            self.accept(candidate, criteria);
            self.last_event = Some(StepEvent::Accepted);
        } else {
            self.last_event = Some(StepEvent::Rejected);
        }

        self.log_if_frozen();
        true
    }

    fn accept(&mut self, candidate: P::Configuration, criteria: P::Criteria) {
        self.accepted_moves += 1;
        self.steps_since_change = 0;

        if criteria.is_valid() && self.best_criteria.worse_than(&criteria) > 0.0 {
            self.best = candidate.clone();
            self.best_criteria = criteria.clone();
            self.steps_since_betterment = 0;
            trace!("new best at step {}", self.steps_total);
        }

        self.current = candidate;
        self.current_criteria = criteria;
    }

    fn log_if_frozen(&self) {
        if let Some(reason) = self.stop_reason() {
            info!(
                "annealing frozen after {} steps ({} accepted): {reason}",
                self.steps_total, self.accepted_moves
            );
        }
    }

    /// Steps until frozen and returns the outcome.
    pub fn run_to_completion(&mut self) -> SaResult<P::Configuration, P::Criteria> {
        while self.step() {}
        self.result()
    }

    /// Steps until frozen, calling `observer` after every step.
    pub fn run_with_observer<F>(&mut self, mut observer: F) -> SaResult<P::Configuration, P::Criteria>
    where
        F: FnMut(&Self),
    {
        while self.step() {
            observer(self);
        }
        self.result()
    }

    /// A snapshot of the best configuration and the run statistics.
    pub fn result(&self) -> SaResult<P::Configuration, P::Criteria> {
        SaResult {
            best: self.best.clone(),
            best_criteria: self.best_criteria.clone(),
            iterations: self.steps_total,
            final_temperature: self.temperature,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            cooling_ticks: self.cooling_ticks,
            stop_reason: self.stop_reason(),
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn config(&self) -> &SaConfig {
        &self.config
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn current(&self) -> &P::Configuration {
        &self.current
    }

    pub fn current_criteria(&self) -> &P::Criteria {
        &self.current_criteria
    }

    pub fn best(&self) -> &P::Configuration {
        &self.best
    }

    pub fn best_criteria(&self) -> &P::Criteria {
        &self.best_criteria
    }

    pub fn steps_total(&self) -> u64 {
        self.steps_total
    }

    pub fn steps_in_equilibrium(&self) -> u64 {
        self.steps_in_equilibrium
    }

    pub fn steps_since_change(&self) -> u64 {
        self.steps_since_change
    }

    pub fn steps_since_betterment(&self) -> u64 {
        self.steps_since_betterment
    }

    pub fn last_event(&self) -> Option<StepEvent> {
        self.last_event
    }
}

/// One-call entry point for a complete run.
pub struct SaRunner;

impl SaRunner {
    /// Runs simulated annealing from a random start until frozen.
    pub fn run<P, R>(
        problem: P,
        config: &SaConfig,
        rng: R,
    ) -> Result<SaResult<P::Configuration, P::Criteria>, ConfigError>
    where
        P: AnnealingProblem,
        R: Rng,
    {
        let mut annealer = Annealer::new(problem, config.clone(), rng)?;
        Ok(annealer.run_to_completion())
    }
}

impl<P, R> fmt::Debug for Annealer<P, R>
where
    P: AnnealingProblem,
    P::Criteria: fmt::Debug,
    R: Rng,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annealer")
            .field("temperature", &self.temperature)
            .field("current_criteria", &self.current_criteria)
            .field("best_criteria", &self.best_criteria)
            .field("steps_total", &self.steps_total)
            .field("steps_in_equilibrium", &self.steps_in_equilibrium)
            .field("steps_since_change", &self.steps_since_change)
            .field("steps_since_betterment", &self.steps_since_betterment)
            .finish_non_exhaustive()
    }
}
