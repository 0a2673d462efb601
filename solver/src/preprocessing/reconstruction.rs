use crate::{CNFVar, cnf::VarId, log_targets};

/// A simplification that removed a variable from the formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The literal was forced or pure and is true in every model found
    Fixed(CNFVar),
    /// The variable was resolved away; `clauses` are the ones that contained it
    Eliminated {
        variable: VarId,
        clauses: Vec<Vec<CNFVar>>,
    },
}

/// Record of the steps taken by the preprocessing passes, in order.
///
/// Replaying it backwards extends a model of the simplified formula to a
/// model of the formula the passes started from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    steps: Vec<Step>,
}

impl Reconstruction {
    pub fn new() -> Reconstruction {
        Reconstruction { steps: Vec::new() }
    }

    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Overwrites the values of fixed and eliminated variables in `valuation`.
    ///
    /// An eliminated variable is set true unless that falsifies one of the
    /// clauses it was removed with.
    pub fn restore(&self, valuation: &mut [bool]) {
        for step in self.steps.iter().rev() {
            match step {
                Step::Fixed(literal) => valuation[literal.id - 1] = literal.sign,
                Step::Eliminated { variable, clauses } => {
                    valuation[variable - 1] = true;
                    let satisfied = clauses.iter()
                        .all(|clause| clause.iter().any(|lit| valuation[lit.id - 1] == lit.sign));
                    if !satisfied {
                        valuation[variable - 1] = false;
                    }
                    log::trace!(target: log_targets::RECONSTRUCTION,
                        "x{} = {}", variable, valuation[variable - 1]);
                }
            }
        }
    }

    pub(crate) fn footprint(&self) -> usize {
        use std::mem::size_of;
        self.steps.capacity() * size_of::<Step>()
            + self.steps.iter()
                .map(|step| match step {
                    Step::Fixed(_) => 0,
                    Step::Eliminated { clauses, .. } => clauses.iter()
                        .map(|clause| clause.len() * size_of::<CNFVar>())
                        .sum(),
                })
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_steps_are_undone_first() {
        let mut reconstruction = Reconstruction::new();
        reconstruction.push(Step::Eliminated {
            variable: 2,
            clauses: vec![vec![CNFVar::pos(1), CNFVar::pos(2)], vec![CNFVar::neg(2), CNFVar::pos(3)]],
        });
        reconstruction.push(Step::Fixed(CNFVar::pos(3)));

        let mut valuation = vec![false, false, false];
        reconstruction.restore(&mut valuation);
        assert_eq!(valuation, vec![false, true, true]);
    }

    #[test]
    fn eliminated_variable_falls_back_to_false() {
        let mut reconstruction = Reconstruction::new();
        reconstruction.push(Step::Eliminated {
            variable: 1,
            clauses: vec![vec![CNFVar::neg(1), CNFVar::pos(2)]],
        });

        let mut valuation = vec![true, false];
        reconstruction.restore(&mut valuation);
        assert_eq!(valuation, vec![false, false]);
    }
}
