//! Incremental evaluation of assignments.
//!
//! [`Evaluator`] keeps mutable mirrors of the instance's clauses and
//! variables for one assignment:
//!
//! - every live term caches whether it is currently satisfied,
//! - every live clause counts its satisfied terms (satisfied iff > 0),
//! - every live variable lists the term slots it occurs in.
//!
//! A [`rebuild`](Evaluator::rebuild) costs O(total literals). A
//! [`flip`](Evaluator::flip) touches only the flipped variable's occurrence
//! list, so it costs O(degree) and keeps the satisfied-clause count and the
//! weight of the bundled [`EvaluatedConfig`] current.
//!
//! All cross references are indices into flat arrays owned by the
//! evaluator.

use log::debug;

use super::assignment::Assignment;
use super::instance::Instance;
use super::types::{Term, VarId};

/// Jumps up to this many variables are always applied as flips, so the
/// one-flip neighbors of an annealing step never trigger a rebuild, even on
/// tiny instances.
const FLIP_ALWAYS: usize = 8;

/// An assignment together with its satisfied-clause count and weight.
///
/// `weight` always equals the sum of the weights of the variables set to
/// true in `assignment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedConfig {
    assignment: Assignment,
    satisfied_count: usize,
    weight: i64,
}

impl EvaluatedConfig {
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn satisfied_count(&self) -> usize {
        self.satisfied_count
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    /// Whether every clause of `instance` is satisfied.
    pub fn is_satisfied(&self, instance: &Instance) -> bool {
        self.satisfied_count == instance.clause_count()
    }

    /// Recomputes the weight from scratch over the whole assignment.
    pub fn recompute_weight(&self, instance: &Instance) -> i64 {
        instance.weight_of(&self.assignment)
    }

    pub fn into_assignment(self) -> Assignment {
        self.assignment
    }
}

/// Signed effect of flipping one variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipDelta {
    /// Change in the number of satisfied clauses.
    pub satisfied: isize,
    /// Change in total weight.
    pub weight: i64,
}

#[derive(Debug, Clone, Copy)]
struct LiveTerm {
    term: Term,
    satisfied: bool,
}

/// A clause's span in the term arena and its satisfied-term count.
#[derive(Debug, Clone, Copy)]
struct LiveClause {
    start: usize,
    len: usize,
    satisfied_terms: usize,
}

impl LiveClause {
    fn is_satisfied(&self) -> bool {
        self.satisfied_terms > 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Occurrence {
    clause: usize,
    term: usize,
}

#[derive(Debug, Clone, Default)]
struct LiveVariable {
    value: bool,
    occurrences: Vec<Occurrence>,
}

/// Incremental evaluator over one [`Instance`].
///
/// # Examples
///
/// ```
/// use u_maxwsat::sat::{Assignment, Evaluator, Instance};
///
/// let instance = Instance::new(&[vec![1, -2], vec![2]], &[3, 5]).unwrap();
/// let mut evaluator = Evaluator::new(&instance);
/// evaluator.rebuild(Assignment::all_false(2));
/// assert_eq!(evaluator.current().unwrap().satisfied_count(), 1);
///
/// let delta = evaluator.flip(2);
/// assert_eq!((delta.satisfied, delta.weight), (0, 5));
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    instance: &'a Instance,
    terms: Vec<LiveTerm>,
    clauses: Vec<LiveClause>,
    /// Indexed by id; slot 0 is unused.
    variables: Vec<LiveVariable>,
    current: Option<EvaluatedConfig>,
    scratch: Vec<VarId>,
    rebuilds: usize,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator that has not been built yet.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            terms: Vec::with_capacity(instance.literal_count()),
            clauses: Vec::with_capacity(instance.clause_count()),
            variables: Vec::with_capacity(instance.variable_count() + 1),
            current: None,
            scratch: Vec::new(),
            rebuilds: 0,
        }
    }

    /// Creates an evaluator and builds it from `assignment`.
    pub fn with_assignment(instance: &'a Instance, assignment: Assignment) -> Self {
        let mut evaluator = Self::new(instance);
        evaluator.rebuild(assignment);
        evaluator
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// The evaluated configuration, or `None` before the first rebuild.
    pub fn current(&self) -> Option<&EvaluatedConfig> {
        self.current.as_ref()
    }

    pub fn is_built(&self) -> bool {
        self.current.is_some()
    }

    /// Rebuilds every live structure from `assignment`. O(total literals).
    ///
    /// # Panics
    ///
    /// Panics if the assignment length differs from the instance's variable
    /// count.
    pub fn rebuild(&mut self, assignment: Assignment) -> &EvaluatedConfig {
        self.instance.check_length(&assignment);

        self.terms.clear();
        self.clauses.clear();
        let mut satisfied_count = 0;
        for clause in self.instance.clauses() {
            let start = self.terms.len();
            let mut satisfied_terms = 0;
            for &term in clause.terms() {
                let satisfied = term.is_satisfied_by(assignment.get(term.id()));
                if satisfied {
                    satisfied_terms += 1;
                }
                self.terms.push(LiveTerm { term, satisfied });
            }
            let live = LiveClause {
                start,
                len: clause.len(),
                satisfied_terms,
            };
            if live.is_satisfied() {
                satisfied_count += 1;
            }
            self.clauses.push(live);
        }

        self.variables
            .resize_with(self.instance.variable_count() + 1, LiveVariable::default);
        for (id, variable) in self.variables.iter_mut().enumerate().skip(1) {
            variable.value = assignment.get(id);
            variable.occurrences.clear();
        }
        for (index, clause) in self.clauses.iter().enumerate() {
            for slot in clause.start..clause.start + clause.len {
                let id = self.terms[slot].term.id();
                self.variables[id].occurrences.push(Occurrence {
                    clause: index,
                    term: slot,
                });
            }
        }

        let weight = self.instance.weight_of(&assignment);
        self.rebuilds += 1;
        debug!(
            "evaluator rebuilt: {satisfied_count}/{} clauses satisfied, weight {weight}",
            self.instance.clause_count()
        );
        self.current.insert(EvaluatedConfig {
            assignment,
            satisfied_count,
            weight,
        })
    }

    /// Flips variable `id` and updates the evaluated configuration.
    /// O(degree of `id`).
    ///
    /// # Panics
    ///
    /// Panics if called before [`rebuild`](Self::rebuild) or if `id` is not
    /// a variable of the instance.
    pub fn flip(&mut self, id: VarId) -> FlipDelta {
        let current = self
            .current
            .as_mut()
            .expect("Evaluator::flip called before rebuild");
        assert!(
            id >= 1 && id < self.variables.len(),
            "variable id {id} outside 1..={}",
            self.variables.len() - 1
        );

        let variable = &mut self.variables[id];
        let mut satisfied = 0isize;
        for occurrence in &variable.occurrences {
            let clause = &mut self.clauses[occurrence.clause];
            let term = &mut self.terms[occurrence.term];
            let was_satisfied = clause.is_satisfied();

            term.satisfied = !term.satisfied;
            if term.satisfied {
                clause.satisfied_terms += 1;
            } else {
                clause.satisfied_terms -= 1;
            }

            match (was_satisfied, clause.is_satisfied()) {
                (false, true) => satisfied += 1,
                (true, false) => satisfied -= 1,
                _ => {}
            }
        }

        let was_set = variable.value;
        variable.value = !was_set;
        current.assignment.flip(id);

        let variable_weight = i64::from(self.instance.variable(id).weight());
        let weight = if was_set {
            -variable_weight
        } else {
            variable_weight
        };
        current.weight += weight;
        current.satisfied_count = current
            .satisfied_count
            .checked_add_signed(satisfied)
            .expect("satisfied clause count underflow");

        debug_assert_eq!(
            current.weight,
            self.instance.weight_of(&current.assignment),
            "incremental weight diverged from recomputation"
        );

        FlipDelta { satisfied, weight }
    }

    /// The effect [`flip`](Self::flip) would have, without applying it.
    /// O(degree of `id`).
    ///
    /// # Panics
    ///
    /// Same conditions as [`flip`](Self::flip).
    pub fn peek_flip(&self, id: VarId) -> FlipDelta {
        assert!(self.is_built(), "Evaluator::peek_flip called before rebuild");
        assert!(
            id >= 1 && id < self.variables.len(),
            "variable id {id} outside 1..={}",
            self.variables.len() - 1
        );

        let variable = &self.variables[id];
        let mut satisfied = 0isize;
        for occurrence in &variable.occurrences {
            let clause = &self.clauses[occurrence.clause];
            if self.terms[occurrence.term].satisfied {
                // the only satisfied term is about to turn false
                if clause.satisfied_terms == 1 {
                    satisfied -= 1;
                }
            } else if clause.satisfied_terms == 0 {
                satisfied += 1;
            }
        }

        let variable_weight = i64::from(self.instance.variable(id).weight());
        FlipDelta {
            satisfied,
            weight: if variable.value {
                -variable_weight
            } else {
                variable_weight
            },
        }
    }

    /// Number of rebuilds since construction.
    pub(crate) fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Moves the evaluator to `target`.
    ///
    /// Flips each differing variable when the target is close to the current
    /// assignment. Rebuilds when the evaluator is unbuilt, or when more than
    /// eight variables and more than a quarter of all variables differ.
    ///
    /// # Panics
    ///
    /// Panics if the assignment length differs from the instance's variable
    /// count.
    pub fn advance_to(&mut self, target: &Assignment) -> &EvaluatedConfig {
        self.instance.check_length(target);

        let Some(current) = self.current.as_ref() else {
            return self.rebuild(target.clone());
        };
        let distance = current.assignment.hamming_distance(target);
        if distance > FLIP_ALWAYS && distance * 4 > target.len() {
            return self.rebuild(target.clone());
        }

        let mut pending = std::mem::take(&mut self.scratch);
        pending.clear();
        pending.extend(current.assignment.differing_ids(target));
        for &id in &pending {
            let _ = self.flip(id);
        }
        self.scratch = pending;

        self.current
            .as_ref()
            .expect("evaluator is built after advancing")
    }

    /// Whether clause `index` is satisfied under the current assignment.
    pub fn is_clause_satisfied(&self, index: usize) -> bool {
        self.satisfied_terms(index) > 0
    }

    /// Number of satisfied terms in clause `index`.
    ///
    /// # Panics
    ///
    /// Panics before the first rebuild or if `index` is out of range.
    pub fn satisfied_terms(&self, index: usize) -> usize {
        assert!(self.is_built(), "evaluator queried before rebuild");
        self.clauses[index].satisfied_terms
    }

    /// Current value of variable `id`.
    pub fn value(&self, id: VarId) -> bool {
        self.current
            .as_ref()
            .expect("evaluator queried before rebuild")
            .assignment
            .get(id)
    }
}
