use std::cmp::{Ordering, Reverse};

use itertools::Itertools;

use super::{ClauseDb, Halt, Preprocessor, Step};
use crate::{
    CNFVar, Deadline,
    cnf::VarId,
    log_targets,
    trail::ClauseId,
    util::PriorityQueue,
};

/// Bounded variable elimination by clause distribution (NiVER).
///
/// A variable is replaced by all non-tautological resolvents of its positive
/// and negative clauses when every resolvent has at most
/// `max_resolvent_len` literals and there are no more resolvents than
/// clauses mentioning the variable. Candidates are tried in ascending order
/// of their current occurrence count, ties broken by variable id, each at
/// most once per call.
pub struct NiVER {
    max_resolvent_len: usize,
}

enum Resolution {
    Eliminate(Vec<Vec<CNFVar>>),
    Skip,
}

impl NiVER {
    pub fn new(max_resolvent_len: usize) -> NiVER {
        NiVER { max_resolvent_len }
    }

    fn priority(db: &ClauseDb, variable: VarId) -> Reverse<(usize, VarId)> {
        Reverse((db.occurrence_count(variable), variable))
    }

    /// Resolvent of two sorted clauses on `variable`, `None` if tautological
    fn resolve(positive: &[CNFVar], negative: &[CNFVar], variable: VarId) -> Option<Vec<CNFVar>> {
        let mut resolvent = Vec::with_capacity(positive.len() + negative.len() - 2);
        let merged = positive.iter()
            .merge_by(negative.iter(), |a, b| a.cmp(b) != Ordering::Greater)
            .filter(|lit| lit.id != variable)
            .dedup();
        for &lit in merged {
            if resolvent.last().map_or(false, |last: &CNFVar| last.id == lit.id) {
                return None;
            }
            resolvent.push(lit);
        }
        Some(resolvent)
    }

    fn resolvents(&self, db: &ClauseDb, variable: VarId, positive: &[ClauseId], negative: &[ClauseId]) -> Resolution {
        let bound = positive.len() + negative.len();
        let mut resolvents = Vec::new();
        for (&p, &n) in positive.iter().cartesian_product(negative.iter()) {
            if let Some(resolvent) = Self::resolve(db.clause(p), db.clause(n), variable) {
                if resolvent.len() > self.max_resolvent_len || resolvents.len() == bound {
                    return Resolution::Skip;
                }
                resolvents.push(resolvent);
            }
        }
        Resolution::Eliminate(resolvents)
    }
}

impl Preprocessor for NiVER {
    fn preprocess(&mut self, db: &mut ClauseDb, deadline: &Deadline) -> Result<bool, Halt> {
        let mut queue: PriorityQueue<Reverse<(usize, VarId)>, VarId> = (1..=db.num_variables())
            .filter(|&variable| db.occurrence_count(variable) > 0)
            .map(|variable| (variable, Self::priority(db, variable)))
            .collect();

        let mut changed = false;
        while let Some((variable, _)) = queue.pop() {
            if deadline.is_expired() {
                return Err(Halt::TimedOut);
            }

            let positive: Vec<ClauseId> = db.occurrences(CNFVar::pos(variable)).iter().copied().collect();
            let negative: Vec<ClauseId> = db.occurrences(CNFVar::neg(variable)).iter().copied().collect();
            if positive.is_empty() && negative.is_empty() {
                continue;
            }

            let resolvents = match self.resolvents(db, variable, &positive, &negative) {
                Resolution::Eliminate(resolvents) => resolvents,
                Resolution::Skip => {
                    db.stats_mut().bve_skipped += 1;
                    continue;
                }
            };
            if resolvents.iter().any(Vec::is_empty) {
                return Err(Halt::Unsatisfiable);
            }

            let removed: Vec<Vec<CNFVar>> = positive.iter().chain(negative.iter())
                .filter_map(|&id| db.remove(id))
                .collect();
            let neighbours: Vec<VarId> = removed.iter()
                .flatten()
                .map(|lit| lit.id)
                .filter(|&id| id != variable)
                .unique()
                .collect();

            log::trace!(target: log_targets::PREPROCESSING,
                "eliminate x{}: {} clauses replaced by {} resolvents", variable, removed.len(), resolvents.len());
            db.record(Step::Eliminated { variable, clauses: removed });
            for resolvent in resolvents {
                db.add(resolvent);
            }
            db.stats_mut().variables_eliminated += 1;
            changed = true;

            for neighbour in neighbours {
                queue.change_priority(&neighbour, Self::priority(db, neighbour));
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CNF;

    #[test]
    fn resolvent_drops_the_pivot() {
        let positive = [CNFVar::pos(1), CNFVar::pos(2), CNFVar::neg(3)];
        let negative = [CNFVar::neg(2), CNFVar::neg(3), CNFVar::pos(4)];
        assert_eq!(
            NiVER::resolve(&positive, &negative, 2),
            Some(vec![CNFVar::pos(1), CNFVar::neg(3), CNFVar::pos(4)])
        );
    }

    #[test]
    fn tautological_resolvent_is_discarded() {
        let positive = [CNFVar::pos(1), CNFVar::pos(2)];
        let negative = [CNFVar::neg(1), CNFVar::neg(2)];
        assert_eq!(NiVER::resolve(&positive, &negative, 1), None);
    }

    #[test]
    fn eliminates_variable_and_records_its_clauses() {
        // x1 occurs twice and produces a single resolvent
        let formula = CNF::from_literals(3, vec![vec![1, 2], vec![-1, 3], vec![2, 3], vec![-2, -3]]).unwrap();
        let mut db = ClauseDb::new(&formula);

        assert_eq!(NiVER::new(10).preprocess(&mut db, &Deadline::none()), Ok(true));
        assert_eq!(db.occurrence_count(1), 0);
        assert!(db.stats().variables_eliminated >= 1);

        let (simplified, reconstruction, _) = db.into_parts();
        assert!(simplified.clauses().iter().all(|clause| clause.vars.iter().all(|lit| lit.id != 1)));
        assert!(matches!(reconstruction.steps()[0], Step::Eliminated { variable: 1, .. }));
    }

    #[test]
    fn equal_counts_are_eliminated_in_id_order() {
        // x1 and x2 both occur twice, x3 and x4 four times; every resolvent
        // is tautological, so both candidates are eliminated
        let formula = CNF::from_literals(4, vec![
            vec![2, 3, 4], vec![-2, -3, 4], vec![1, 3, 4], vec![-1, 3, -4],
        ]).unwrap();
        let mut db = ClauseDb::new(&formula);

        assert_eq!(NiVER::new(10).preprocess(&mut db, &Deadline::none()), Ok(true));
        assert!(db.is_empty());

        let (_, reconstruction, _) = db.into_parts();
        let eliminated: Vec<VarId> = reconstruction.steps().iter()
            .map(|step| match step {
                Step::Eliminated { variable, .. } => *variable,
                other => panic!("unexpected step {:?}", other),
            })
            .collect();
        assert_eq!(eliminated, vec![1, 2]);
    }

    #[test]
    fn long_resolvents_are_skipped() {
        let formula = CNF::from_literals(5, vec![vec![1, 2, 3], vec![-1, 4, 5]]).unwrap();
        let db = ClauseDb::new(&formula);

        assert!(matches!(NiVER::new(3).resolvents(&db, 1, &[0], &[1]), Resolution::Skip));
        assert!(matches!(NiVER::new(4).resolvents(&db, 1, &[0], &[1]), Resolution::Eliminate(r) if r.len() == 1));
    }

    #[test]
    fn growth_bound_is_enforced() {
        let formula = CNF::from_literals(6, vec![
            vec![1, 2], vec![1, 3], vec![1, 4], vec![-1, 5], vec![-1, 6],
        ]).unwrap();
        let db = ClauseDb::new(&formula);

        // 3 x 2 clauses give 6 resolvents for 5 clauses
        assert!(matches!(NiVER::new(10).resolvents(&db, 1, &[0, 1, 2], &[3, 4]), Resolution::Skip));
        // 2 x 2 clauses give 4 resolvents for 4 clauses
        assert!(matches!(NiVER::new(10).resolvents(&db, 1, &[0, 1], &[3, 4]), Resolution::Eliminate(r) if r.len() == 4));
    }

    #[test]
    fn skipped_candidates_are_counted() {
        let formula = CNF::from_literals(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3]]).unwrap();
        let mut db = ClauseDb::new(&formula);

        assert_eq!(NiVER::new(1).preprocess(&mut db, &Deadline::none()), Ok(false));
        assert_eq!(db.len(), 3);
        assert_eq!(db.stats().bve_skipped, 3);
    }
}
