use super::{ClauseDb, Halt, Preprocessor};
use crate::{CNFVar, Deadline, log_targets};

/// Removes every clause that contains all literals of another clause.
///
/// Clauses are compared pairwise. Of two identical clauses the one added
/// first is kept.
pub struct Subsumption;

/// Bloom-style summary of a clause: a subset's signature has no bit the
/// superset's lacks.
fn signature(clause: &[CNFVar]) -> u64 {
    clause.iter().fold(0, |sig, lit| sig | 1 << (lit.index() % 64))
}

/// Both clauses are sorted, so a single merge decides inclusion.
fn is_subset(small: &[CNFVar], large: &[CNFVar]) -> bool {
    let mut large = large.iter();
    small.iter().all(|lit| large.any(|other| other == lit))
}

impl Preprocessor for Subsumption {
    fn preprocess(&mut self, db: &mut ClauseDb, deadline: &Deadline) -> Result<bool, Halt> {
        let ids = db.ids();
        let signatures: Vec<u64> = ids.iter().map(|&id| signature(db.clause(id))).collect();

        let mut changed = false;
        for (i, &subsuming) in ids.iter().enumerate() {
            if deadline.is_expired() {
                return Err(Halt::TimedOut);
            }
            if !db.contains(subsuming) {
                continue;
            }

            for (j, &subsumed) in ids.iter().enumerate() {
                if i == j || !db.contains(subsumed) {
                    continue;
                }
                let (small, large) = (db.clause(subsuming), db.clause(subsumed));
                if small.len() > large.len() || signatures[i] & !signatures[j] != 0 {
                    continue;
                }
                if is_subset(small, large) {
                    log::trace!(target: log_targets::PREPROCESSING, "clause {} subsumes {}", subsuming, subsumed);
                    db.remove(subsumed);
                    db.stats_mut().clauses_subsumed += 1;
                    changed = true;
                }
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
    fn subset_test_on_sorted_clauses() {
        let small = [CNFVar::neg(1), CNFVar::pos(3)];
        let large = [CNFVar::neg(1), CNFVar::pos(2), CNFVar::pos(3)];
        assert!(is_subset(&small, &large));
        assert!(!is_subset(&large, &small));
        assert!(!is_subset(&[CNFVar::pos(1)], &large));
    }

    #[test]
    fn removes_supersets() {
        let formula = CNF::from_literals(3, vec![vec![1, 2, 3], vec![2, 1], vec![-1, 3], vec![3, -1, -2]]).unwrap();
        let mut db = ClauseDb::new(&formula);

        assert_eq!(Subsumption.preprocess(&mut db, &Deadline::none()), Ok(true));
        assert_eq!(db.ids(), vec![1, 2]);
        assert_eq!(db.stats().clauses_subsumed, 2);
    }

    #[test]
    fn keeps_first_of_identical_clauses() {
        let formula = CNF::from_literals(2, vec![vec![1, -2], vec![2], vec![-2, 1]]).unwrap();
        let mut db = ClauseDb::new(&formula);

        assert_eq!(Subsumption.preprocess(&mut db, &Deadline::none()), Ok(true));
        assert_eq!(db.ids(), vec![0, 1]);
    }
}
