use auto_impl::auto_impl;

use crate::{
    CNFVar,
    dpll::Clauses,
    trail::AssignmentTrail,
};

#[auto_impl(&mut, Box)]
pub trait BranchingStrategy {
    /// Picks the literal to branch on next.
    /// Returns `None` if no unsatisfied clause has an unassigned literal.
    fn pick_literal(&mut self, clauses: &Clauses, trail: &AssignmentTrail) -> Option<CNFVar>;
}

/// Dynamic Largest Individual Sum.
///
/// Picks the unassigned literal occurring most often in clauses that are not
/// yet satisfied. Ties go to the smaller variable id and then to the positive
/// literal. With phase saving, the chosen variable takes the polarity it had
/// when it was last assigned, if it ever was.
#[derive(Clone, Debug, Default)]
pub struct DLIS {
    phase_saving: bool,
    /// Occurrences per literal, indexed by [`CNFVar::index`]
    counts: Vec<usize>,
}

impl DLIS {
    pub fn new(phase_saving: bool) -> DLIS {
        DLIS { phase_saving, counts: Vec::new() }
    }

    fn count_occurrences(&mut self, clauses: &Clauses, trail: &AssignmentTrail) {
        self.counts.clear();
        self.counts.resize(2 * (trail.num_variables() + 1), 0);

        let open_clauses = clauses.iter()
            .filter(|clause| clause.literals.iter().all(|&lit| trail.literal_value(lit) != Some(true)));
        for clause in open_clauses {
            for &lit in &clause.literals {
                if trail.literal_value(lit).is_none() {
                    self.counts[lit.index()] += 1;
                }
            }
        }
    }
}

impl BranchingStrategy for DLIS {
    fn pick_literal(&mut self, clauses: &Clauses, trail: &AssignmentTrail) -> Option<CNFVar> {
        self.count_occurrences(clauses, trail);

        let mut max = 0;
        let mut best: Option<CNFVar> = None;
        for id in 1..=trail.num_variables() {
            for &sign in &[true, false] {
                let lit = CNFVar::new(id, sign);
                let count = self.counts[lit.index()];
                if count > max {
                    max = count;
                    best = Some(lit);
                }
            }
        }

        best.map(|lit| match trail.saved_phase(lit.id) {
            Some(phase) if self.phase_saving => CNFVar::new(lit.id, phase),
            _ => lit,
        })
    }
}
