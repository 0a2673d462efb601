use super::{ClauseDb, Halt, Preprocessor};
use crate::{Deadline, log_targets};

/// Assigns the literal of every unit clause until none is left.
pub struct UnitPropagation;

impl Preprocessor for UnitPropagation {
    fn preprocess(&mut self, db: &mut ClauseDb, deadline: &Deadline) -> Result<bool, Halt> {
        let mut queue: Vec<_> = db.ids().into_iter()
            .filter(|&id| db.clause(id).len() == 1)
            .collect();
        queue.reverse();

        let mut changed = false;
        while let Some(id) = queue.pop() {
            if deadline.is_expired() {
                return Err(Halt::TimedOut);
            }
            // the clause may have been satisfied by an earlier unit
            if !db.contains(id) || db.clause(id).len() != 1 {
                continue;
            }

            let literal = db.clause(id)[0];
            log::trace!(target: log_targets::PREPROCESSING, "unit {}", literal);
            let shortened = db.assign(literal)?;
            db.stats_mut().units_fixed += 1;
            changed = true;

            queue.extend(shortened.into_iter().filter(|&id| db.clause(id).len() == 1));
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CNF;

    #[test]
    fn chains_units() {
        let formula = CNF::from_literals(4, vec![vec![1], vec![-1, 2], vec![-2, 3, 4], vec![-2, -3]]).unwrap();
        let mut db = ClauseDb::new(&formula);

        assert_eq!(UnitPropagation.preprocess(&mut db, &Deadline::none()), Ok(true));
        assert_eq!(db.stats().units_fixed, 4);
        assert_eq!(db.len(), 0);
        assert_eq!(UnitPropagation.preprocess(&mut db, &Deadline::none()), Ok(false));

        let (simplified, reconstruction, _) = db.into_parts();
        assert!(simplified.is_empty());
        let mut valuation = vec![false; 4];
        reconstruction.restore(&mut valuation);
        assert_eq!(valuation, vec![true, true, false, true]);
        assert_eq!(reconstruction.len(), 4);
    }

    #[test]
    fn conflicting_units_halt() {
        let formula = CNF::from_literals(2, vec![vec![1], vec![-1, 2], vec![-2]]).unwrap();
        let mut db = ClauseDb::new(&formula);
        assert_eq!(UnitPropagation.preprocess(&mut db, &Deadline::none()), Err(Halt::Unsatisfiable));
    }
}
