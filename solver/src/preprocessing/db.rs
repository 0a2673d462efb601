use std::mem::size_of;

use stable_vec::StableVec;

use super::{Halt, reconstruction::{Reconstruction, Step}};
use crate::{
    CNF, CNFClause, CNFVar,
    cnf::VarId,
    metrics::PreprocessingStats,
    trail::ClauseId,
    util::{BuildHasher, IndexSet},
};

/// Mutable working copy of a formula shared by the preprocessing passes.
///
/// Clauses keep their id for as long as they live. Literals inside a clause
/// are sorted and unique, and no clause is a tautology.
pub struct ClauseDb {
    num_variables: usize,
    clauses: StableVec<Vec<CNFVar>>,
    /// Clauses containing each literal, indexed by [`CNFVar::index`]
    occurrences: Vec<IndexSet<ClauseId>>,
    reconstruction: Reconstruction,
    stats: PreprocessingStats,
    has_empty_clause: bool,
}

impl ClauseDb {
    pub fn new(formula: &CNF) -> ClauseDb {
        let num_variables = formula.num_variables();
        let mut db = ClauseDb {
            num_variables,
            clauses: StableVec::new(),
            occurrences: (0..2 * (num_variables + 1))
                .map(|_| IndexSet::with_hasher(BuildHasher::default()))
                .collect(),
            reconstruction: Reconstruction::new(),
            stats: PreprocessingStats::default(),
            has_empty_clause: false,
        };

        for clause in formula.clauses() {
            if db.add(clause.vars.clone()).is_none() {
                db.stats.tautologies_removed += 1;
            }
        }
        db
    }

    /// Inserts a clause, returning `None` if it is a tautology.
    pub fn add(&mut self, mut literals: Vec<CNFVar>) -> Option<ClauseId> {
        literals.sort();
        literals.dedup();
        // after sorting, complementary literals are neighbours
        if literals.windows(2).any(|pair| pair[0].id == pair[1].id) {
            return None;
        }

        if literals.is_empty() {
            self.has_empty_clause = true;
        }
        let id = self.clauses.push(literals);
        for lit in &self.clauses[id] {
            self.occurrences[lit.index()].insert(id);
        }
        Some(id)
    }

    pub fn remove(&mut self, id: ClauseId) -> Option<Vec<CNFVar>> {
        let literals = self.clauses.remove(id)?;
        for lit in &literals {
            self.occurrences[lit.index()].shift_remove(&id);
        }
        Some(literals)
    }

    pub fn contains(&self, id: ClauseId) -> bool {
        self.clauses.has_element_at(id)
    }

    pub fn clause(&self, id: ClauseId) -> &[CNFVar] {
        &self.clauses[id]
    }

    /// Ids of the live clauses in insertion order
    pub fn ids(&self) -> Vec<ClauseId> {
        self.clauses.indices().collect()
    }

    pub fn occurrences(&self, literal: CNFVar) -> &IndexSet<ClauseId> {
        &self.occurrences[literal.index()]
    }

    /// Number of clauses mentioning the variable in either polarity
    pub fn occurrence_count(&self, variable: VarId) -> usize {
        self.occurrences[CNFVar::pos(variable).index()].len()
            + self.occurrences[CNFVar::neg(variable).index()].len()
    }

    /// Makes `literal` true: clauses containing it are dropped, its negation
    /// is deleted from the others.
    ///
    /// Returns the ids of the shortened clauses. Emptying a clause proves the
    /// formula unsatisfiable.
    pub fn assign(&mut self, literal: CNFVar) -> Result<Vec<ClauseId>, Halt> {
        self.reconstruction.push(Step::Fixed(literal));

        let satisfied: Vec<ClauseId> = self.occurrences[literal.index()].iter().copied().collect();
        for id in satisfied {
            self.remove(id);
        }

        let falsified = -literal;
        let shortened: Vec<ClauseId> = self.occurrences[falsified.index()].drain(..).collect();
        for &id in &shortened {
            let clause = &mut self.clauses[id];
            clause.retain(|&lit| lit != falsified);
            if clause.is_empty() {
                self.has_empty_clause = true;
            }
        }

        if self.has_empty_clause {
            Err(Halt::Unsatisfiable)
        } else {
            Ok(shortened)
        }
    }

    pub(crate) fn record(&mut self, step: Step) {
        self.reconstruction.push(step);
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn len(&self) -> usize {
        self.clauses.num_elements()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn has_empty_clause(&self) -> bool {
        self.has_empty_clause
    }

    pub fn stats(&self) -> &PreprocessingStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut PreprocessingStats {
        &mut self.stats
    }

    /// Bytes held by the clauses, occurrence lists and reconstruction steps
    pub fn footprint(&self) -> usize {
        self.clauses.values().map(|clause| clause.capacity() * size_of::<CNFVar>()).sum::<usize>()
            + self.clauses.capacity() * size_of::<Vec<CNFVar>>()
            + self.occurrences.iter().map(|set| set.capacity() * 2 * size_of::<ClauseId>()).sum::<usize>()
            + self.reconstruction.footprint()
    }

    /// The remaining clauses, in insertion order, over the original variables
    pub fn into_parts(mut self) -> (CNF, Reconstruction, PreprocessingStats) {
        let clauses = self.ids().into_iter()
            .filter_map(|id| self.clauses.remove(id))
            .map(|literals| CNFClause { vars: literals })
            .collect();
        (CNF::from_trusted(self.num_variables, clauses), self.reconstruction, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(clauses: Vec<Vec<i64>>, num_variables: usize) -> ClauseDb {
        ClauseDb::new(&CNF::from_literals(num_variables, clauses).unwrap())
    }

    #[test]
    fn normalises_clauses_on_load() {
        let db = db(vec![vec![2, 1, 2], vec![1, -1, 3]], 3);
        assert_eq!(db.len(), 1);
        assert_eq!(db.clause(0), &[CNFVar::pos(1), CNFVar::pos(2)]);
        assert_eq!(db.stats().tautologies_removed, 1);
        assert_eq!(db.occurrence_count(2), 1);
        assert_eq!(db.occurrence_count(3), 0);
    }

    #[test]
    fn assign_simplifies_and_keeps_ids() {
        let mut db = db(vec![vec![1, 2], vec![-1, 3], vec![-1, -2, 3]], 3);
        let shortened = db.assign(CNFVar::pos(1)).unwrap();

        assert_eq!(shortened, vec![1, 2]);
        assert!(!db.contains(0));
        assert_eq!(db.clause(1), &[CNFVar::pos(3)]);
        assert_eq!(db.clause(2), &[CNFVar::neg(2), CNFVar::pos(3)]);
        assert_eq!(db.occurrence_count(1), 0);
        assert!(db.occurrences(CNFVar::pos(2)).is_empty());
    }

    #[test]
    fn assign_reports_empty_clause() {
        let mut db = db(vec![vec![1], vec![-1]], 1);
        assert_eq!(db.assign(CNFVar::pos(1)), Err(Halt::Unsatisfiable));
    }
}
