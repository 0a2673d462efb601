use std::mem::size_of;

use itertools::Itertools;
use log::{debug, trace};

use crate::{
    CNF, CNFClause, CNFVar, Deadline, Metrics, Valuation,
    branching_strategy::BranchingStrategy,
    log_targets,
    propagation::{Propagation, Propagator},
    trail::{AssignmentTrail, Reason},
};

/// Clause as seen by the search: duplicate literals collapsed, original
/// literal order otherwise kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<CNFVar>,
}

pub type Clauses = Vec<Clause>;

impl Clause {
    pub fn new(cnf_clause: &CNFClause) -> Clause {
        Clause {
            literals: cnf_clause.vars.iter().copied().unique().collect(),
        }
    }
}

/// Search clauses of a formula. Tautologies are satisfied by every
/// assignment and are left out.
pub fn clauses_of(formula: &CNF) -> Clauses {
    formula.clauses().iter()
        .filter(|clause| !clause.is_tautology())
        .map(Clause::new)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Propagating,
    Deciding,
    Backtracking,
    Satisfied,
    Unsatisfied,
    TimedOut,
}

impl State {
    fn is_terminal(self) -> bool {
        matches!(self, State::Satisfied | State::Unsatisfied | State::TimedOut)
    }
}

/// Terminal state reached by the search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// Every clause is satisfied; unassigned variables are reported false
    Satisfied(Valuation),
    Unsatisfied,
    TimedOut,
}

impl SearchResult {
    fn verdict(&self) -> &'static str {
        match self {
            SearchResult::Satisfied(_) => "SAT",
            SearchResult::Unsatisfied => "UNSAT",
            SearchResult::TimedOut => "TIMEOUT",
        }
    }
}

/// DPLL with chronological backtracking.
///
/// The engine owns every structure of a single solve. It is consumed by
/// [`SearchEngine::run`], so nothing outlives the solve it was built for.
pub struct SearchEngine<P: Propagator, B: BranchingStrategy> {
    clauses: Clauses,
    trail: AssignmentTrail,
    propagator: P,
    branching: B,
    metrics: Metrics,
    has_empty_clause: bool,
}

impl<P: Propagator, B: BranchingStrategy> SearchEngine<P, B> {
    pub fn new(formula: &CNF, branching: B) -> SearchEngine<P, B> {
        let clauses = clauses_of(formula);
        let has_empty_clause = clauses.iter().any(|clause| clause.literals.is_empty());
        let propagator = P::initialise(&clauses, formula.num_variables());

        SearchEngine {
            trail: AssignmentTrail::new(formula.num_variables()),
            clauses,
            propagator,
            branching,
            metrics: Metrics::default(),
            has_empty_clause,
        }
    }

    pub fn run(mut self, deadline: &Deadline) -> (SearchResult, Metrics) {
        self.observe_memory();

        let result = if self.has_empty_clause {
            self.metrics.conflicts += 1;
            SearchResult::Unsatisfied
        } else {
            self.search(deadline)
        };

        debug!(target: log_targets::SEARCH,
            "search finished: {} after {} decisions, {} backtracks",
            result.verdict(), self.metrics.decisions, self.metrics.backtracks);
        (result, self.metrics)
    }

    fn search(&mut self, deadline: &Deadline) -> SearchResult {
        let mut state = State::Propagating;
        while !state.is_terminal() {
            if deadline.is_expired() {
                state = State::TimedOut;
                break;
            }
            state = match state {
                State::Propagating => self.propagate(deadline),
                State::Deciding => self.decide(),
                State::Backtracking => self.backtrack(),
                terminal => terminal,
            };
        }

        match state {
            State::Satisfied => SearchResult::Satisfied(
                self.trail.values().iter().map(|value| value.unwrap_or(false)).collect()
            ),
            State::Unsatisfied => SearchResult::Unsatisfied,
            _ => SearchResult::TimedOut,
        }
    }

    fn propagate(&mut self, deadline: &Deadline) -> State {
        match self.propagator.propagate(&self.clauses, &mut self.trail, &mut self.metrics, deadline) {
            Propagation::Conflict(clause) => {
                trace!(target: log_targets::SEARCH, "conflict in clause {} on level {}", clause, self.trail.current_level());
                self.metrics.conflicts += 1;
                State::Backtracking
            }
            Propagation::Interrupted => State::TimedOut,
            Propagation::Fixpoint if self.trail.len() == self.trail.num_variables() => State::Satisfied,
            Propagation::Fixpoint => State::Deciding,
        }
    }

    fn decide(&mut self) -> State {
        match self.branching.pick_literal(&self.clauses, &self.trail) {
            // every clause is already satisfied
            None => State::Satisfied,
            Some(literal) => {
                self.metrics.decisions += 1;
                let level = self.trail.current_level() + 1;
                trace!(target: log_targets::SEARCH, "decide {} on level {}", literal, level);
                self.trail.push(literal, level, Reason::Decision);
                self.observe_memory();
                State::Propagating
            }
        }
    }

    fn backtrack(&mut self) -> State {
        self.metrics.backtracks += 1;
        while let Some(branch) = self.trail.last_branch() {
            self.trail.undo_to(branch.level);
            self.propagator.on_undo(self.trail.len());

            if branch.reason == Reason::Decision {
                trace!(target: log_targets::SEARCH, "flip {} on level {}", branch.literal, branch.level);
                self.trail.push(-branch.literal, branch.level, Reason::NegatedDecision);
                return State::Propagating;
            }
        }
        State::Unsatisfied
    }

    fn observe_memory(&mut self) {
        let clauses = self.clauses.capacity() * size_of::<Clause>()
            + self.clauses.iter().map(|clause| clause.literals.capacity() * size_of::<CNFVar>()).sum::<usize>();
        let bytes = clauses + self.trail.footprint() + self.propagator.footprint();
        self.metrics.observe_memory(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching_strategy::DLIS,
        propagation::{LinearPropagator, WatchedPropagator},
        sat_solver::check_valuation,
    };

    fn run<P: Propagator>(formula: &CNF) -> (SearchResult, Metrics) {
        SearchEngine::<P, DLIS>::new(formula, DLIS::new(false)).run(&Deadline::none())
    }

    #[test]
    fn duplicate_literals_are_collapsed() {
        let clause = Clause::new(&CNFClause { vars: vec![CNFVar::pos(2), CNFVar::neg(1), CNFVar::pos(2)] });
        assert_eq!(clause.literals, vec![CNFVar::pos(2), CNFVar::neg(1)]);
    }

    #[test]
    fn tautologies_are_skipped() {
        let formula = CNF::from_literals(2, vec![vec![1, -1], vec![2]]).unwrap();
        assert_eq!(clauses_of(&formula).len(), 1);
    }

    #[test]
    fn finds_model_after_backtracking() {
        // DLIS picks x1 first, which forces a conflict
        let formula = CNF::from_literals(4, vec![
            vec![1, 2], vec![1, 3], vec![1, 4], vec![-1, 2], vec![-1, -2],
        ]).unwrap();
        for (result, metrics) in vec![run::<LinearPropagator>(&formula), run::<WatchedPropagator>(&formula)] {
            match result {
                SearchResult::Satisfied(valuation) => assert!(check_valuation(&formula, &valuation)),
                other => panic!("expected a model, got {:?}", other),
            }
            assert_eq!(metrics.decisions, 1);
            assert_eq!(metrics.backtracks, 1);
            assert_eq!(metrics.conflicts, 1);
        }
    }

    #[test]
    fn exhausts_both_branches_before_unsat() {
        let formula = CNF::from_literals(2, vec![vec![1, 2], vec![1, -2], vec![-1, 2], vec![-1, -2]]).unwrap();
        let (result, metrics) = run::<LinearPropagator>(&formula);
        assert_eq!(result, SearchResult::Unsatisfied);
        assert_eq!(metrics.decisions, 1);
        assert_eq!(metrics.backtracks, 2);
        assert_eq!(metrics.conflicts, 2);
    }

    #[test]
    fn empty_clause_is_immediately_unsat() {
        let formula = CNF::from_literals(1, vec![vec![1], vec![]]).unwrap();
        let (result, metrics) = run::<WatchedPropagator>(&formula);
        assert_eq!(result, SearchResult::Unsatisfied);
        assert_eq!(metrics.decisions, 0);
    }

    #[test]
    fn free_variables_default_to_false() {
        let formula = CNF::from_literals(3, vec![vec![2]]).unwrap();
        let (result, _) = run::<LinearPropagator>(&formula);
        assert_eq!(result, SearchResult::Satisfied(vec![false, true, false]));
    }

    #[test]
    fn expired_deadline_times_out() {
        let formula = CNF::from_literals(1, vec![vec![1]]).unwrap();
        let deadline = Deadline::at(std::time::Instant::now());
        let (result, _) = SearchEngine::<LinearPropagator, DLIS>::new(&formula, DLIS::new(false)).run(&deadline);
        assert_eq!(result, SearchResult::TimedOut);
    }
}
