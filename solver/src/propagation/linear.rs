use super::{Propagation, Propagator};
use crate::{
    CNFVar, Deadline, Metrics,
    dpll::Clauses,
    log_targets,
    trail::{AssignmentTrail, Reason},
};

/// Unit propagation by repeated full scans of the formula.
///
/// Each round visits every clause, so a round costs the total number of
/// literals regardless of how few assignments changed.
pub struct LinearPropagator;

enum ClauseState {
    Satisfied,
    Unit(CNFVar),
    Falsified,
    Open,
}

impl LinearPropagator {
    fn clause_state(literals: &[CNFVar], trail: &AssignmentTrail) -> ClauseState {
        let mut free = None;
        let mut num_free = 0;
        for &lit in literals {
            match trail.literal_value(lit) {
                Some(true) => return ClauseState::Satisfied,
                Some(false) => (),
                None => {
                    num_free += 1;
                    free = Some(lit);
                }
            }
        }
        match (num_free, free) {
            (0, _) => ClauseState::Falsified,
            (1, Some(lit)) => ClauseState::Unit(lit),
            _ => ClauseState::Open,
        }
    }
}

impl Propagator for LinearPropagator {
    fn initialise(_clauses: &Clauses, _num_variables: usize) -> Self {
        LinearPropagator
    }

    fn propagate(
        &mut self,
        clauses: &Clauses,
        trail: &mut AssignmentTrail,
        metrics: &mut Metrics,
        deadline: &Deadline,
    ) -> Propagation {
        loop {
            if deadline.is_expired() {
                return Propagation::Interrupted;
            }

            let mut changed = false;
            for (id, clause) in clauses.iter().enumerate() {
                match Self::clause_state(&clause.literals, trail) {
                    ClauseState::Satisfied | ClauseState::Open => (),
                    ClauseState::Falsified => {
                        log::trace!(target: log_targets::PROPAGATION, "clause {} falsified", id);
                        return Propagation::Conflict(id);
                    }
                    ClauseState::Unit(lit) => {
                        let level = trail.current_level();
                        trail.push(lit, level, Reason::Propagated(id));
                        metrics.unit_propagations += 1;
                        changed = true;
                    }
                }
            }

            if !changed {
                return Propagation::Fixpoint;
            }
        }
    }
}
