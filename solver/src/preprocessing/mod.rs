mod db;
mod niver;
mod pure_literal;
mod reconstruction;
mod subsumption;
mod unit;

pub use db::ClauseDb;
pub use niver::NiVER;
pub use pure_literal::PureLiteralElimination;
pub use reconstruction::{Reconstruction, Step};
pub use subsumption::Subsumption;
pub use unit::UnitPropagation;

use auto_impl::auto_impl;
use log::debug;

use crate::{CNF, Deadline, log_targets, metrics::PreprocessingStats};

/// Why a pass stopped before reaching its fixpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// An empty clause was derived
    Unsatisfiable,
    TimedOut,
}

/// A satisfiability preserving rewrite of the clause database.
#[auto_impl(&mut, Box)]
pub trait Preprocessor {
    /// Runs the pass once. Returns whether the database changed.
    fn preprocess(&mut self, db: &mut ClauseDb, deadline: &Deadline) -> Result<bool, Halt>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessingConfig {
    /// Longest resolvent variable elimination may produce
    pub bve_max_resolvent_len: usize,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        PreprocessingConfig {
            bve_max_resolvent_len: 10,
        }
    }
}

/// Simplified formula together with what is needed to map its models back.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub formula: CNF,
    pub reconstruction: Reconstruction,
    pub stats: PreprocessingStats,
}

#[derive(Debug, Clone)]
pub enum PreprocessOutcome {
    Simplified(Preprocessed),
    /// An empty clause was derived; the search can be skipped
    Unsatisfiable(PreprocessingStats),
    TimedOut(PreprocessingStats),
}

/// The passes, run in order and repeated until none of them changes the
/// formula.
pub struct Pipeline {
    passes: Vec<Box<dyn Preprocessor>>,
}

impl Pipeline {
    pub fn new(config: PreprocessingConfig) -> Pipeline {
        Pipeline {
            passes: vec![
                Box::new(UnitPropagation),
                Box::new(PureLiteralElimination),
                Box::new(Subsumption),
                Box::new(NiVER::new(config.bve_max_resolvent_len)),
            ],
        }
    }

    /// A pipeline running the given passes
    pub fn with_passes(passes: Vec<Box<dyn Preprocessor>>) -> Pipeline {
        Pipeline { passes }
    }

    pub fn run(&mut self, formula: &CNF, deadline: &Deadline) -> PreprocessOutcome {
        let mut db = ClauseDb::new(formula);
        match self.run_to_fixpoint(&mut db, deadline) {
            Ok(()) => {
                let (formula, reconstruction, stats) = db.into_parts();
                debug!(target: log_targets::PREPROCESSING,
                    "simplified to {} clauses in {} rounds", formula.len(), stats.rounds);
                PreprocessOutcome::Simplified(Preprocessed { formula, reconstruction, stats })
            }
            Err(Halt::Unsatisfiable) => {
                debug!(target: log_targets::PREPROCESSING, "derived the empty clause");
                PreprocessOutcome::Unsatisfiable(db.stats().clone())
            }
            Err(Halt::TimedOut) => PreprocessOutcome::TimedOut(db.stats().clone()),
        }
    }

    fn run_to_fixpoint(&mut self, db: &mut ClauseDb, deadline: &Deadline) -> Result<(), Halt> {
        Self::observe_memory(db);
        if db.has_empty_clause() {
            return Err(Halt::Unsatisfiable);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for pass in self.passes.iter_mut() {
                if deadline.is_expired() {
                    return Err(Halt::TimedOut);
                }
                changed |= pass.preprocess(db, deadline)?;
            }
            db.stats_mut().rounds += 1;
            Self::observe_memory(db);
            debug!(target: log_targets::PREPROCESSING,
                "round {}: {} clauses left", db.stats().rounds, db.len());
        }
        Ok(())
    }

    fn observe_memory(db: &mut ClauseDb) {
        let bytes = db.footprint();
        let stats = db.stats_mut();
        stats.peak_memory = stats.peak_memory.max(bytes);
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(PreprocessingConfig::default())
    }
}
