use auto_impl::auto_impl;
use rayon::prelude::*;

use crate::{CNF, Deadline, SolveOutcome};

#[auto_impl(&, Box)]
pub trait Solver {
    /// Decides the formula, giving up once `deadline` has passed.
    fn solve(&self, formula: &CNF, deadline: Deadline) -> SolveOutcome;
}

/// Checks that every clause of the formula has a literal agreeing with `val`
pub fn check_valuation(formula: &CNF, val: &[bool]) -> bool {
    val.len() >= formula.num_variables()
        && formula.clauses().par_iter()
            .all(|clause| clause.is_satisfied_by(val))
}
