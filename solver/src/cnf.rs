use std::fmt;
use std::ops::Neg;
use std::collections::BTreeSet;
use std::iter::FromIterator;
use itertools::Itertools;

use dimacs::parse_dimacs;
use crate::error::{Result, SolverError};

/// Type used for referencing logical variables
pub type VarId = usize;

/// Representation of logical formulae in CNF form
/// (conjunction of clauses).
///
/// A formula is validated once on construction and is read-only afterwards:
/// every literal refers to a variable in `1..=num_variables`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CNF {
    clauses: Vec<CNFClause>,
    num_variables: usize,
}

/// Representation of a clause (disjunction of literals)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct CNFClause {
    /// Vector of inner literals
    pub vars: Vec<CNFVar>,
}

/// Logical literal
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Ord, Eq, Hash)]
pub struct CNFVar {
    /// Identifier of a variable
    pub id: VarId,
    /// Variable is negated iff `sign == false`
    pub sign: bool,
}

impl CNF {
    /// Creates a formula over `num_variables` variables.
    ///
    /// Fails with [`SolverError::InvalidFormula`] if a literal refers to
    /// variable `0` or to a variable above `num_variables`.
    pub fn new(num_variables: usize, clauses: Vec<CNFClause>) -> Result<CNF> {
        for (index, clause) in clauses.iter().enumerate() {
            if let Some(lit) = clause.vars.iter().find(|lit| lit.id == 0 || lit.id > num_variables) {
                return Err(SolverError::InvalidFormula {
                    clause: index,
                    literal: lit.to_i64(),
                    num_variables,
                });
            }
        }
        Ok(CNF { clauses, num_variables })
    }

    /// Creates a formula from signed integer literals, the sign stating the polarity
    pub fn from_literals<C, L>(num_variables: usize, clauses: C) -> Result<CNF>
    where
        C: IntoIterator<Item = L>,
        L: IntoIterator<Item = i64>,
    {
        let mut converted = Vec::new();
        for (index, clause) in clauses.into_iter().enumerate() {
            let vars = clause.into_iter()
                .map(|lit| CNFVar::from_i64(lit).ok_or(SolverError::InvalidFormula {
                    clause: index,
                    literal: lit,
                    num_variables,
                }))
                .collect::<Result<Vec<CNFVar>>>()?;
            converted.push(CNFClause { vars });
        }
        CNF::new(num_variables, converted)
    }

    /// Creates an empty CNF formula over no variables
    pub fn empty() -> CNF {
        CNF { clauses: Vec::new(), num_variables: 0 }
    }

    /// Builds a formula whose literals are already known to be in range.
    pub(crate) fn from_trusted(num_variables: usize, clauses: Vec<CNFClause>) -> CNF {
        debug_assert!(clauses.iter()
            .flat_map(|clause| clause.vars.iter())
            .all(|lit| lit.id >= 1 && lit.id <= num_variables));
        CNF { clauses, num_variables }
    }

    pub fn clauses(&self) -> &[CNFClause] {
        &self.clauses
    }

    /// Upper bound of the variable identifiers
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Returns number of clauses in the formula
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Collects all variable identifiers that appear in the formula
    pub fn vars(&self) -> BTreeSet<VarId> {
        self.clauses.iter()
            .flat_map(|clause| clause.vars.iter().map(CNFVar::id))
            .collect()
    }

    /// Total number of literal occurrences
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(CNFClause::len).sum()
    }

    /// Prints formula in DIMACS compatible form
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_variables, self.clauses.len());
        for clause in &self.clauses {
            for var in &clause.vars {
                out.push_str(&var.to_i64().to_string());
                out.push(' ');
            }
            out.push_str("0\n");
        }
        out
    }

    /// Parse DIMACS string into CNF structure
    pub fn from_dimacs(input: &str) -> Result<CNF> {
        match parse_dimacs(input) {
            Ok(dimacs::Instance::Cnf { num_vars, clauses }) => {
                let clauses = clauses.iter()
                    .map(|clause|
                         clause.lits().iter()
                         .map(|lit|
                              CNFVar {
                                  id: lit.var().to_u64() as VarId,
                                  sign: lit.sign() == dimacs::Sign::Pos,
                              }
                         ).collect()
                    ).collect();
                CNF::new(num_vars as usize, clauses)
            }
            Ok(_) => Err(SolverError::UnsupportedInstance),
            Err(err) => Err(SolverError::Parse(format!("{:?}", err))),
        }
    }
}

impl IntoIterator for CNF {
    type Item = CNFClause;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl CNFClause {
    /// Creates an empty CNF clause
    pub fn new() -> CNFClause {
        CNFClause { vars: vec![] }
    }

    /// Creates a CNF clause containing a single literal
    pub fn single(var: CNFVar) -> CNFClause {
        CNFClause { vars: vec![var] }
    }

    /// Adds a single literal into the clause
    pub fn push(&mut self, v: CNFVar) {
        self.vars.push(v)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Checks if the clause contains a literal together with its negation
    pub fn is_tautology(&self) -> bool {
        self.vars.iter().any(|var| self.vars.contains(&-*var))
    }

    /// Checks if any literal of the clause agrees with the valuation.
    /// `valuation[i]` holds the value of variable `i + 1`.
    pub fn is_satisfied_by(&self, valuation: &[bool]) -> bool {
        self.vars.iter().any(|var| valuation[var.id - 1] == var.sign)
    }
}

impl FromIterator<CNFVar> for CNFClause {
    fn from_iter<I: IntoIterator<Item = CNFVar>>(iter: I) -> Self {
        CNFClause { vars: iter.into_iter().collect() }
    }
}

impl IntoIterator for CNFClause {
    type Item = CNFVar;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.into_iter()
    }
}

impl CNFVar {
    /// Creates literal with given identifier and positivity
    pub fn new(id: VarId, sign: bool) -> CNFVar {
        CNFVar { id, sign }
    }

    /// Creates a positive literal with given identifier
    pub fn pos(id: VarId) -> CNFVar {
        CNFVar { id, sign: true }
    }

    /// Creates a negative literal with given identifier
    pub fn neg(id: VarId) -> CNFVar {
        CNFVar { id, sign: false }
    }

    /// Gets the identifier of a variable
    pub fn id(&self) -> VarId {
        self.id
    }

    /// Checks if the literal is positive
    pub fn sign(&self) -> bool {
        self.sign
    }

    /// Converts from a signed integer, `None` for zero
    pub fn from_i64(lit: i64) -> Option<CNFVar> {
        match lit {
            0 => None,
            _ => Some(CNFVar { id: lit.unsigned_abs() as VarId, sign: lit > 0 }),
        }
    }

    /// Converts to signed integer. The absolute value indicates
    /// the identifier and sign states for positivity.
    pub fn to_i64(&self) -> i64 {
        if self.sign {
            self.id as i64
        } else {
            -(self.id as i64)
        }
    }

    /// Dense index of the literal, `2 * id + sign`
    #[inline]
    pub(crate) fn index(&self) -> usize {
        2 * self.id + self.sign as usize
    }
}

impl Neg for CNFVar {
    type Output = CNFVar;

    fn neg(self) -> Self::Output {
        CNFVar { id: self.id, sign: !self.sign }
    }
}

impl fmt::Display for CNF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.clauses {
            writeln!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Display for CNFClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.vars.iter().join(" ∨ "))
    }
}

impl fmt::Display for CNFVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_i64())
    }
}
