use std::time::Duration;

use crate::{Deadline, SolveOutcome, CNF, Solver};

/// Caps every solve of the wrapped solver at `max_duration`.
///
/// The deadline passed to `solve` still applies when it is stricter.
pub struct TimeLimitedSolver<S: Solver> {
    max_duration: Duration,
    solver: S,
}

impl<S: Solver> TimeLimitedSolver<S> {
    pub fn new(solver: S, max_duration: Duration) -> TimeLimitedSolver<S> {
        TimeLimitedSolver {
            solver,
            max_duration,
        }
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }
}

impl<S: Solver> Solver for TimeLimitedSolver<S> {
    fn solve(&self, formula: &CNF, deadline: Deadline) -> SolveOutcome {
        let deadline = deadline.earliest(Deadline::after(self.max_duration));
        self.solver.solve(formula, deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bruteforce;

    #[test]
    fn zero_duration_times_out() {
        let formula = CNF::from_literals(2, vec![vec![1, 2]]).unwrap();
        let solver = TimeLimitedSolver::new(Bruteforce, Duration::from_secs(0));
        let outcome = solver.solve(&formula, Deadline::none());
        assert!(outcome.solution.is_timed_out());
        assert!(outcome.metrics.timed_out);
    }

    #[test]
    fn generous_limit_lets_the_solver_finish() {
        let formula = CNF::from_literals(2, vec![vec![1, 2], vec![-1]]).unwrap();
        let solver = TimeLimitedSolver::new(&Bruteforce, Duration::from_secs(60));
        assert!(solver.solve(&formula, Deadline::none()).solution.is_sat());
    }
}
