//! Immutable MaxWSAT instance.

use log::warn;
use thiserror::Error;

use super::assignment::Assignment;
use super::dimacs::ParsedInstance;
use super::types::{Clause, Term, VarId};

/// Reasons an instance cannot be built from parsed data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceError {
    #[error("instance has no clauses")]
    NoClauses,

    #[error("instance has no weights")]
    NoWeights,

    #[error("clause {clause} contains the literal 0")]
    ZeroLiteral { clause: usize },

    #[error("clause {clause} refers to variable {id}, but only {variable_count} variables have weights")]
    UnknownVariable {
        clause: usize,
        id: VarId,
        variable_count: usize,
    },
}

/// A weighted variable and the clauses it occurs in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    id: VarId,
    weight: i32,
    /// Indices into [`Instance::clauses`], ascending.
    occurrences: Vec<usize>,
}

impl Variable {
    pub fn id(&self) -> VarId {
        self.id
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    /// Indices of the clauses mentioning this variable.
    pub fn occurrences(&self) -> &[usize] {
        &self.occurrences
    }

    /// Number of clauses mentioning this variable.
    pub fn degree(&self) -> usize {
        self.occurrences.len()
    }
}

/// A Maximum Weighted SAT instance: clauses over weighted variables.
///
/// Built once and read-only afterwards. Variables are addressed by their
/// 1-based id.
///
/// # Examples
///
/// ```
/// use u_maxwsat::sat::Instance;
///
/// let instance = Instance::new(&[vec![1, -2], vec![2]], &[3, 5]).unwrap();
/// assert_eq!(instance.variable_count(), 2);
/// assert_eq!(instance.clause_count(), 2);
/// assert_eq!(instance.weight_total(), 8);
/// assert_eq!(instance.variable(2).occurrences(), &[0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    /// `variables[i]` has id `i + 1`.
    variables: Vec<Variable>,
    clauses: Vec<Clause>,
    weight_total: i64,
}

impl Instance {
    /// Builds an instance from DIMACS literal lists and per-variable weights.
    ///
    /// `weights[i]` is the weight of variable `i + 1`; the number of weights
    /// is the number of variables.
    pub fn new(clauses: &[Vec<i32>], weights: &[i32]) -> Result<Self, InstanceError> {
        if clauses.is_empty() {
            return Err(InstanceError::NoClauses);
        }
        if weights.is_empty() {
            return Err(InstanceError::NoWeights);
        }
        let variable_count = weights.len();

        let mut built = Vec::with_capacity(clauses.len());
        for (index, literals) in clauses.iter().enumerate() {
            let mut terms = Vec::with_capacity(literals.len());
            for &literal in literals {
                let term = Term::new(literal).ok_or(InstanceError::ZeroLiteral { clause: index })?;
                if term.id() > variable_count {
                    return Err(InstanceError::UnknownVariable {
                        clause: index,
                        id: term.id(),
                        variable_count,
                    });
                }
                terms.push(term);
            }

            let mut distinct = literals.clone();
            distinct.sort_unstable();
            distinct.dedup();
            let clause = Clause::new(terms);
            if clause.len() < distinct.len() {
                warn!("clause {index} mentions a variable with both polarities; keeping the first literal");
            }
            built.push(clause);
        }

        let mut variables: Vec<Variable> = weights
            .iter()
            .enumerate()
            .map(|(i, &weight)| Variable {
                id: i + 1,
                weight,
                occurrences: Vec::new(),
            })
            .collect();
        for (index, clause) in built.iter().enumerate() {
            for term in clause.terms() {
                variables[term.id() - 1].occurrences.push(index);
            }
        }

        let weight_total = weights.iter().map(|&w| i64::from(w)).sum();

        Ok(Self {
            variables,
            clauses: built,
            weight_total,
        })
    }

    /// Variables in id order (`variables()[0]` has id 1).
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The variable with the given 1-based id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is 0 or larger than [`variable_count`](Self::variable_count).
    pub fn variable(&self, id: VarId) -> &Variable {
        assert!(
            id >= 1 && id <= self.variables.len(),
            "variable id {id} outside 1..={}",
            self.variables.len()
        );
        &self.variables[id - 1]
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Total number of terms across all clauses.
    pub fn literal_count(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Sum of all variable weights.
    pub fn weight_total(&self) -> i64 {
        self.weight_total
    }

    /// Sum of absolute variable weights, at least 1. Used to normalize
    /// weights into `[-1, 1]`.
    pub fn weight_scale(&self) -> i64 {
        self.variables
            .iter()
            .map(|v| i64::from(v.weight.unsigned_abs()))
            .sum::<i64>()
            .max(1)
    }

    /// Counts satisfied clauses by scanning the whole instance.
    pub fn count_satisfied(&self, assignment: &Assignment) -> usize {
        self.check_length(assignment);
        self.clauses
            .iter()
            .filter(|c| c.is_satisfied_by(|id| assignment.get(id)))
            .count()
    }

    /// Sums the weights of variables set to true.
    pub fn weight_of(&self, assignment: &Assignment) -> i64 {
        self.check_length(assignment);
        assignment
            .true_ids()
            .map(|id| i64::from(self.variables[id - 1].weight))
            .sum()
    }

    pub(crate) fn check_length(&self, assignment: &Assignment) {
        assert_eq!(
            assignment.len(),
            self.variables.len(),
            "assignment length does not match the instance's variable count"
        );
    }
}

impl TryFrom<ParsedInstance> for Instance {
    type Error = InstanceError;

    fn try_from(parsed: ParsedInstance) -> Result<Self, Self::Error> {
        Self::new(&parsed.clauses, &parsed.weights)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 4 variables weighted [2, 4, 1, 6] over 6 clauses.
    pub(crate) fn example_instance() -> Instance {
        Instance::new(
            &[
                vec![1, -3, 4],
                vec![-1, 2, -3],
                vec![3, 4],
                vec![1, 2, -3, -4],
                vec![-2, 3],
                vec![-3, -4],
            ],
            &[2, 4, 1, 6],
        )
        .unwrap()
    }

    fn literals(instance: &Instance, clause: usize) -> Vec<i32> {
        instance.clauses()[clause]
            .terms()
            .iter()
            .map(|t| t.literal())
            .collect()
    }

    #[test]
    fn test_example_clauses() {
        let instance = example_instance();
        assert_eq!(instance.clause_count(), 6);
        assert_eq!(literals(&instance, 0), vec![1, -3, 4]);
        assert_eq!(literals(&instance, 1), vec![-1, 2, -3]);
        assert_eq!(literals(&instance, 2), vec![3, 4]);
        assert_eq!(literals(&instance, 3), vec![1, 2, -3, -4]);
        assert_eq!(literals(&instance, 4), vec![-2, 3]);
        assert_eq!(literals(&instance, 5), vec![-3, -4]);
        assert_eq!(instance.literal_count(), 16);
    }

    #[test]
    fn test_example_variables() {
        let instance = example_instance();
        assert_eq!(instance.variable_count(), 4);
        let weights: Vec<i32> = instance.variables().iter().map(Variable::weight).collect();
        assert_eq!(weights, vec![2, 4, 1, 6]);
        let ids: Vec<VarId> = instance.variables().iter().map(Variable::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let degrees: Vec<usize> = instance.variables().iter().map(Variable::degree).collect();
        assert_eq!(degrees, vec![3, 3, 6, 4]);
        assert_eq!(instance.variable(1).occurrences(), &[0, 1, 3]);
        assert_eq!(instance.variable(4).occurrences(), &[0, 2, 3, 5]);
        assert_eq!(instance.weight_total(), 13);
        assert_eq!(instance.weight_scale(), 13);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert_eq!(Instance::new(&[], &[1]), Err(InstanceError::NoClauses));
        assert_eq!(Instance::new(&[vec![1]], &[]), Err(InstanceError::NoWeights));
    }

    #[test]
    fn test_bad_literals_rejected() {
        assert_eq!(
            Instance::new(&[vec![1], vec![2, 0]], &[1, 1]),
            Err(InstanceError::ZeroLiteral { clause: 1 })
        );
        assert_eq!(
            Instance::new(&[vec![1, -3]], &[1, 1]),
            Err(InstanceError::UnknownVariable {
                clause: 0,
                id: 3,
                variable_count: 2
            })
        );
    }

    #[test]
    fn test_duplicate_literals_collapse() {
        let instance = Instance::new(&[vec![2, 1, 2, 1]], &[1, 1]).unwrap();
        assert_eq!(literals(&instance, 0), vec![1, 2]);
        assert_eq!(instance.variable(1).occurrences(), &[0]);
    }

    #[test]
    fn test_negative_weights_scale() {
        let instance = Instance::new(&[vec![1, 2]], &[-3, 5]).unwrap();
        assert_eq!(instance.weight_total(), 2);
        assert_eq!(instance.weight_scale(), 8);
    }

    #[test]
    fn test_from_scratch_evaluation() {
        let instance = example_instance();
        let none = Assignment::all_false(4);
        let all = Assignment::all_true(4);
        assert_eq!(instance.count_satisfied(&none), 5);
        assert_eq!(instance.weight_of(&none), 0);
        assert_eq!(instance.count_satisfied(&all), 5);
        assert_eq!(instance.weight_of(&all), 13);
    }

    #[test]
    #[should_panic(expected = "assignment length")]
    fn test_length_mismatch_panics() {
        example_instance().weight_of(&Assignment::all_false(3));
    }

    #[test]
    #[should_panic]
    fn test_variable_zero_panics() {
        example_instance().variable(0);
    }
}
