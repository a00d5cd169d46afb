//! Literals and clauses.

use std::fmt;

/// Variable identifier. Identifiers start at 1, matching the literal
/// encoding; 0 is never a valid id.
pub type VarId = usize;

/// A variable reference with a polarity.
///
/// Encoded as a non-zero signed integer whose magnitude is the variable id
/// and whose sign is the polarity (negative = negated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Term(i32);

impl Term {
    /// Wraps a DIMACS literal. Returns `None` for 0.
    pub fn new(literal: i32) -> Option<Self> {
        (literal != 0).then_some(Self(literal))
    }

    /// A positive literal of `id`.
    pub fn plain(id: VarId) -> Self {
        Self(id as i32)
    }

    /// A negative literal of `id`.
    pub fn negated(id: VarId) -> Self {
        Self(-(id as i32))
    }

    pub fn id(self) -> VarId {
        self.0.unsigned_abs() as VarId
    }

    pub fn is_negated(self) -> bool {
        self.0 < 0
    }

    pub fn is_plain(self) -> bool {
        self.0 > 0
    }

    /// The same variable with the opposite polarity.
    pub fn negate(self) -> Self {
        Self(-self.0)
    }

    /// Whether the literal holds when its variable has `value`.
    pub fn is_satisfied_by(self, value: bool) -> bool {
        value != self.is_negated()
    }

    /// The signed DIMACS encoding.
    pub fn literal(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A disjunction of terms.
///
/// Terms are sorted by variable id and unique by id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clause {
    terms: Vec<Term>,
}

impl Clause {
    /// Builds a clause, sorting terms by id and keeping the first term
    /// given for each id.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_maxwsat::sat::{Clause, Term};
    ///
    /// let clause = Clause::new(vec![Term::plain(3), Term::negated(1), Term::plain(3)]);
    /// let ids: Vec<usize> = clause.terms().iter().map(|t| t.id()).collect();
    /// assert_eq!(ids, vec![1, 3]);
    /// ```
    pub fn new(mut terms: Vec<Term>) -> Self {
        // stable, so the first occurrence of an id survives dedup
        terms.sort_by_key(|t| t.id());
        terms.dedup_by_key(|t| t.id());
        Self { terms }
    }

    /// Terms sorted by id.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Position of the term over `id`, found by binary search.
    pub fn position_of(&self, id: VarId) -> Option<usize> {
        self.terms.binary_search_by_key(&id, |t| t.id()).ok()
    }

    pub fn contains_variable(&self, id: VarId) -> bool {
        self.position_of(id).is_some()
    }

    /// Evaluates the clause against a value lookup.
    pub fn is_satisfied_by(&self, value_of: impl Fn(VarId) -> bool) -> bool {
        self.terms.iter().any(|t| t.is_satisfied_by(value_of(t.id())))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.terms {
            write!(f, "{term} ")?;
        }
        write!(f, "0")
    }
}
