use std::mem::{size_of, take, replace};

use super::{Propagation, Propagator};
use crate::{
    CNFVar, Deadline, Metrics,
    dpll::Clauses,
    log_targets,
    trail::{AssignmentTrail, ClauseId, Reason},
};

/// Unit propagation with two watched literals per clause.
///
/// Clauses with at least two literals watch two distinct positions. Only the
/// clauses watching a literal are visited when it becomes false. Watches are
/// positions in the clause and remain valid when the trail is undone, so
/// backtracking never touches them.
pub struct WatchedPropagator {
    /// Clauses watching each literal, indexed by [`CNFVar::index`]
    watches: Vec<Vec<ClauseId>>,
    /// Positions of the two watched literals of every clause
    watched: Vec<[usize; 2]>,
    /// Single literal clauses, asserted on the first call
    units: Vec<ClauseId>,
    units_asserted: bool,
    /// Trail entries before this position have had their watchers visited
    processed: usize,
}

impl WatchedPropagator {
    /// Revisits the clauses watching `falsified`.
    ///
    /// The watch list is taken out and scanned as a snapshot; clauses moving
    /// to another literal are appended to that literal's list, the others
    /// are put back.
    fn visit_watchers(
        &mut self,
        falsified: CNFVar,
        clauses: &Clauses,
        trail: &mut AssignmentTrail,
        metrics: &mut Metrics,
    ) -> Option<ClauseId> {
        let watchers = take(&mut self.watches[falsified.index()]);
        let mut kept = Vec::with_capacity(watchers.len());
        let mut conflict = None;

        for (position, &clause_id) in watchers.iter().enumerate() {
            if conflict.is_some() {
                kept.extend_from_slice(&watchers[position..]);
                break;
            }

            let literals = &clauses[clause_id].literals;
            let watched = &mut self.watched[clause_id];

            // keep the falsified watch in the second slot
            if literals[watched[0]] == falsified {
                watched.swap(0, 1);
            }
            if literals[watched[1]] != falsified {
                unreachable!("clause {} is listed under {} without watching it", clause_id, falsified);
            }

            let other = literals[watched[0]];
            if trail.literal_value(other) == Some(true) {
                kept.push(clause_id);
                continue;
            }

            let replacement = (0..literals.len())
                .find(|&index| index != watched[0]
                    && index != watched[1]
                    && trail.literal_value(literals[index]) != Some(false));

            match replacement {
                Some(index) => {
                    watched[1] = index;
                    self.watches[literals[index].index()].push(clause_id);
                }
                None => {
                    kept.push(clause_id);
                    match trail.literal_value(other) {
                        None => {
                            let level = trail.current_level();
                            trail.push(other, level, Reason::Propagated(clause_id));
                            metrics.unit_propagations += 1;
                        }
                        Some(false) => {
                            log::trace!(target: log_targets::PROPAGATION, "clause {} falsified", clause_id);
                            conflict = Some(clause_id);
                        }
                        Some(true) => unreachable!("satisfied watch of clause {} was skipped", clause_id),
                    }
                }
            }
        }

        let appended = replace(&mut self.watches[falsified.index()], kept);
        self.watches[falsified.index()].extend(appended);
        conflict
    }

    fn assert_units(
        &mut self,
        clauses: &Clauses,
        trail: &mut AssignmentTrail,
        metrics: &mut Metrics,
    ) -> Option<ClauseId> {
        self.units_asserted = true;
        for &clause_id in &self.units {
            let literal = clauses[clause_id].literals[0];
            match trail.literal_value(literal) {
                Some(true) => (),
                Some(false) => return Some(clause_id),
                None => {
                    let level = trail.current_level();
                    trail.push(literal, level, Reason::Propagated(clause_id));
                    metrics.unit_propagations += 1;
                }
            }
        }
        None
    }
}

impl Propagator for WatchedPropagator {
    fn initialise(clauses: &Clauses, num_variables: usize) -> Self {
        let mut watches = vec![Vec::new(); 2 * (num_variables + 1)];
        let mut watched = Vec::with_capacity(clauses.len());
        let mut units = Vec::new();

        for (clause_id, clause) in clauses.iter().enumerate() {
            match clause.literals.len() {
                0 => (),
                1 => units.push(clause_id),
                _ => {
                    watches[clause.literals[0].index()].push(clause_id);
                    watches[clause.literals[1].index()].push(clause_id);
                }
            }
            watched.push([0, 1]);
        }

        WatchedPropagator {
            watches,
            watched,
            units,
            units_asserted: false,
            processed: 0,
        }
    }

    fn propagate(
        &mut self,
        clauses: &Clauses,
        trail: &mut AssignmentTrail,
        metrics: &mut Metrics,
        deadline: &Deadline,
    ) -> Propagation {
        if !self.units_asserted {
            if let Some(conflict) = self.assert_units(clauses, trail, metrics) {
                return Propagation::Conflict(conflict);
            }
        }

        while self.processed < trail.len() {
            if deadline.is_expired() {
                return Propagation::Interrupted;
            }

            let assigned = trail.entries()[self.processed].literal;
            self.processed += 1;

            if let Some(conflict) = self.visit_watchers(-assigned, clauses, trail, metrics) {
                return Propagation::Conflict(conflict);
            }
        }
        Propagation::Fixpoint
    }

    fn on_undo(&mut self, trail_len: usize) {
        self.processed = self.processed.min(trail_len);
    }

    fn footprint(&self) -> usize {
        self.watches.iter().map(|list| list.capacity() * size_of::<ClauseId>()).sum::<usize>()
            + self.watches.len() * size_of::<Vec<ClauseId>>()
            + self.watched.len() * size_of::<[usize; 2]>()
            + self.units.len() * size_of::<ClauseId>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CNF, dpll::Clause};

    fn clauses(formula: &CNF) -> Clauses {
        formula.clauses().iter().map(Clause::new).collect()
    }

    /// Every clause with two or more literals is watched at two distinct
    /// positions and listed under exactly those two literals.
    fn assert_watch_invariant(propagator: &WatchedPropagator, clauses: &Clauses) {
        for (id, clause) in clauses.iter().enumerate().filter(|(_, c)| c.literals.len() >= 2) {
            let [a, b] = propagator.watched[id];
            assert_ne!(a, b);
            for (index, lit) in clause.literals.iter().enumerate() {
                let listed = propagator.watches[lit.index()].iter().filter(|&&c| c == id).count();
                let expected = (index == a || index == b) as usize;
                assert_eq!(listed, expected, "clause {} literal {}", id, lit);
            }
        }
    }

    #[test]
    fn propagates_through_rewatched_clauses() {
        let formula = CNF::from_literals(4, vec![vec![-1, -2, 3], vec![-3, 4], vec![1]]).unwrap();
        let clauses = clauses(&formula);
        let mut trail = AssignmentTrail::new(4);
        let mut metrics = Metrics::default();
        let mut propagator = WatchedPropagator::initialise(&clauses, 4);

        assert_eq!(propagator.propagate(&clauses, &mut trail, &mut metrics, &Deadline::none()), Propagation::Fixpoint);
        assert_eq!(trail.value(1), Some(true));
        assert_eq!(trail.value(3), None);
        assert_watch_invariant(&propagator, &clauses);

        trail.push(CNFVar::pos(2), 1, Reason::Decision);
        assert_eq!(propagator.propagate(&clauses, &mut trail, &mut metrics, &Deadline::none()), Propagation::Fixpoint);
        assert_eq!(trail.values(), &[Some(true), Some(true), Some(true), Some(true)]);
        assert_eq!(metrics.unit_propagations, 3);
        assert_watch_invariant(&propagator, &clauses);
    }

    #[test]
    fn watches_stay_valid_across_undo() {
        let formula = CNF::from_literals(3, vec![vec![1, 2, 3], vec![-1, 2], vec![-2, -3]]).unwrap();
        let clauses = clauses(&formula);
        let mut trail = AssignmentTrail::new(3);
        let mut metrics = Metrics::default();
        let mut propagator = WatchedPropagator::initialise(&clauses, 3);

        assert_eq!(propagator.propagate(&clauses, &mut trail, &mut metrics, &Deadline::none()), Propagation::Fixpoint);

        trail.push(CNFVar::pos(1), 1, Reason::Decision);
        assert_eq!(propagator.propagate(&clauses, &mut trail, &mut metrics, &Deadline::none()), Propagation::Fixpoint);
        assert_eq!(trail.value(2), Some(true));
        assert_eq!(trail.value(3), Some(false));

        trail.undo_to(1);
        propagator.on_undo(trail.len());
        assert_watch_invariant(&propagator, &clauses);

        trail.push(CNFVar::neg(1), 1, Reason::NegatedDecision);
        trail.push(CNFVar::neg(2), 1, Reason::Propagated(0));
        assert_eq!(propagator.propagate(&clauses, &mut trail, &mut metrics, &Deadline::none()), Propagation::Fixpoint);
        assert_eq!(trail.value(3), Some(true));
        assert_watch_invariant(&propagator, &clauses);
    }

    #[test]
    fn detects_conflict_when_both_watches_fall() {
        let formula = CNF::from_literals(2, vec![vec![1, 2], vec![-1, 2], vec![-2]]).unwrap();
        let clauses = clauses(&formula);
        let mut trail = AssignmentTrail::new(2);
        let mut metrics = Metrics::default();
        let mut propagator = WatchedPropagator::initialise(&clauses, 2);

        let result = propagator.propagate(&clauses, &mut trail, &mut metrics, &Deadline::none());
        assert!(matches!(result, Propagation::Conflict(_)));
    }

    #[test]
    fn contradicting_units_conflict() {
        let formula = CNF::from_literals(1, vec![vec![1], vec![-1]]).unwrap();
        let clauses = clauses(&formula);
        let mut trail = AssignmentTrail::new(1);
        let mut metrics = Metrics::default();
        let mut propagator = WatchedPropagator::initialise(&clauses, 1);

        let result = propagator.propagate(&clauses, &mut trail, &mut metrics, &Deadline::none());
        assert_eq!(result, Propagation::Conflict(1));
    }
}
