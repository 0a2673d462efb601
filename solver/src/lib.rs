/// The CNF representation of a formula
pub mod cnf;
/// Errors reported while building or loading a formula
pub mod error;
/// The Solver trait which has to be implemented by each solver
pub mod sat_solver;
/// Module that specifies the output of a solver
mod sat_solution;
/// Counters collected during a solve
pub mod metrics;
mod deadline;
/// Targets used by the log records of the solvers
pub mod log_targets;
mod util;
/// Undoable assignment stack shared by the propagators and the search
pub mod trail;
/// Unit propagation, by full rescans or with watched literals
pub mod propagation;
/// Satisfiability preserving simplification run before the search
pub mod preprocessing;
/// Branching heuristics one can choose from to customize the [`SatisfactionSolver`].
pub mod branching_strategy;
/// Module that contains the DPLL search
pub mod dpll;
/// The solver compositions
mod variants;
pub mod bruteforce;
/// A module which offers some additional solver,
/// for one that is limited in time.
pub mod solvers;

pub use cnf::{CNFClause, CNFVar, CNF};
pub use error::{Result, SolverError};
pub use sat_solver::{check_valuation, Solver};
pub use bruteforce::Bruteforce;
pub use branching_strategy::{BranchingStrategy, DLIS};
pub use deadline::Deadline;
pub use metrics::{Metrics, PreprocessingStats};
pub use preprocessing::PreprocessingConfig;
pub use propagation::PropagationKind;
pub use variants::{SatisfactionSolver, SolverVariant, VariantConfig};
pub use sat_solution::{SATSolution, SolveOutcome, Valuation};
