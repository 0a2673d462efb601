use std::time::Instant;

use crate::sat_solver::*;
use crate::{Deadline, Metrics, SATSolution, SolveOutcome, Valuation, CNF};

/// A simple CNF solver that naively checks all possible
/// valuations in order to ensure satisfiability
pub struct Bruteforce;

impl Solver for Bruteforce {
    fn solve(&self, formula: &CNF, deadline: Deadline) -> SolveOutcome {
        let started = Instant::now();
        // initial valuation sets all to false
        let mut valuation = vec![false; formula.num_variables()];
        let solution = match guess(formula, 0, &mut valuation, &deadline) {
            Some(true) => SATSolution::Satisfiable(valuation),
            Some(false) => SATSolution::Unsatisfiable,
            None => SATSolution::TimedOut,
        };

        let metrics = Metrics {
            wall_time: started.elapsed(),
            timed_out: solution.is_timed_out(),
            ..Metrics::default()
        };
        SolveOutcome { solution, metrics }
    }
}

/// `None` if the deadline passed before the answer was known
fn guess(formula: &CNF, change: usize, valuation: &mut Valuation, deadline: &Deadline) -> Option<bool> {
    if change == valuation.len() {
        if deadline.is_expired() {
            return None;
        }
        Some(check_valuation(formula, valuation))
    } else {
        if guess(formula, change + 1, valuation, deadline)? {
            Some(true)
        } else {
            // set current bit
            valuation[change] = true;
            // try again
            let res = guess(formula, change + 1, valuation, deadline)?;
            if !res {
                // if failed set back to default
                valuation[change] = false;
            }
            Some(res)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_only_model() {
        let formula = CNF::from_literals(3, vec![vec![1], vec![-1, -2], vec![2, 3]]).unwrap();
        let outcome = Bruteforce.solve(&formula, Deadline::none());
        assert_eq!(outcome.solution, SATSolution::Satisfiable(vec![true, false, true]));
    }

    #[test]
    fn exhausts_every_valuation() {
        let formula = CNF::from_literals(1, vec![vec![1], vec![-1]]).unwrap();
        assert!(Bruteforce.solve(&formula, Deadline::none()).solution.is_unsat());
    }

    #[test]
    fn empty_formula_has_empty_model() {
        let outcome = Bruteforce.solve(&CNF::empty(), Deadline::none());
        assert_eq!(outcome.solution, SATSolution::Satisfiable(vec![]));
    }
}
