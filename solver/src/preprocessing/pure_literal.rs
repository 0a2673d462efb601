use super::{ClauseDb, Halt, Preprocessor};
use crate::{CNFVar, Deadline, log_targets};

/// Fixes variables that occur in only one polarity.
///
/// Dropping the satisfied clauses can make further literals pure, so the
/// variables are swept until a sweep finds nothing.
pub struct PureLiteralElimination;

impl PureLiteralElimination {
    fn pure_literal(db: &ClauseDb, variable: usize) -> Option<CNFVar> {
        let positive = CNFVar::pos(variable);
        let negative = CNFVar::neg(variable);
        match (db.occurrences(positive).is_empty(), db.occurrences(negative).is_empty()) {
            (false, true) => Some(positive),
            (true, false) => Some(negative),
            _ => None,
        }
    }
}

impl Preprocessor for PureLiteralElimination {
    fn preprocess(&mut self, db: &mut ClauseDb, deadline: &Deadline) -> Result<bool, Halt> {
        let mut changed = false;
        loop {
            if deadline.is_expired() {
                return Err(Halt::TimedOut);
            }

            let mut found = false;
            for variable in 1..=db.num_variables() {
                if let Some(literal) = Self::pure_literal(db, variable) {
                    log::trace!(target: log_targets::PREPROCESSING, "pure {}", literal);
                    db.assign(literal)?;
                    db.stats_mut().pure_literals += 1;
                    found = true;
                }
            }

            if !found {
                return Ok(changed);
            }
            changed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CNF;

    #[test]
    fn removes_clauses_of_pure_literals_transitively() {
        // x3 is pure; removing its clause leaves x2 pure negative
        let formula = CNF::from_literals(3, vec![vec![1, 2, 3], vec![-1, -2], vec![1, -2]]).unwrap();
        let mut db = ClauseDb::new(&formula);

        assert_eq!(PureLiteralElimination.preprocess(&mut db, &Deadline::none()), Ok(true));
        assert!(db.is_empty());
        assert_eq!(db.stats().pure_literals, 2);

        let (_, reconstruction, _) = db.into_parts();
        let mut valuation = vec![false, true, false];
        reconstruction.restore(&mut valuation);
        assert!(formula.clauses().iter().all(|clause| clause.is_satisfied_by(&valuation)));
    }

    #[test]
    fn mixed_polarities_are_left_alone() {
        let formula = CNF::from_literals(2, vec![vec![1, 2], vec![-1, -2]]).unwrap();
        let mut db = ClauseDb::new(&formula);
        assert_eq!(PureLiteralElimination.preprocess(&mut db, &Deadline::none()), Ok(false));
        assert_eq!(db.len(), 2);
    }
}
