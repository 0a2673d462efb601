use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use log::debug;

use crate::{
    CNF, Deadline, Metrics, SATSolution, SolveOutcome, Solver,
    branching_strategy::DLIS,
    dpll::{SearchEngine, SearchResult},
    error::SolverError,
    log_targets,
    metrics::PreprocessingStats,
    preprocessing::{Pipeline, PreprocessOutcome, PreprocessingConfig, Reconstruction},
    propagation::{LinearPropagator, PropagationKind, Propagator, WatchedPropagator},
    sat_solver::check_valuation,
};

/// Composition of a solver out of the available components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantConfig {
    pub propagation: PropagationKind,
    /// `None` hands the input formula to the search unchanged
    pub preprocessing: Option<PreprocessingConfig>,
    pub phase_saving: bool,
}

/// The fixed solver compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverVariant {
    /// Linear propagation, no preprocessing
    Base,
    /// Watched literals, no preprocessing
    Watched,
    /// Linear propagation after the preprocessing pipeline
    Preprocessing,
    /// Watched literals after the preprocessing pipeline, with phase saving
    Combined,
}

impl SolverVariant {
    pub const ALL: [SolverVariant; 4] = [
        SolverVariant::Base,
        SolverVariant::Watched,
        SolverVariant::Preprocessing,
        SolverVariant::Combined,
    ];

    pub fn config(self) -> VariantConfig {
        let (propagation, preprocessing, phase_saving) = match self {
            SolverVariant::Base => (PropagationKind::Linear, None, false),
            SolverVariant::Watched => (PropagationKind::Watched, None, false),
            SolverVariant::Preprocessing => (PropagationKind::Linear, Some(PreprocessingConfig::default()), false),
            SolverVariant::Combined => (PropagationKind::Watched, Some(PreprocessingConfig::default()), true),
        };
        VariantConfig { propagation, preprocessing, phase_saving }
    }

    pub fn name(self) -> &'static str {
        match self {
            SolverVariant::Base => "base",
            SolverVariant::Watched => "watched",
            SolverVariant::Preprocessing => "preprocessing",
            SolverVariant::Combined => "combined",
        }
    }
}

impl FromStr for SolverVariant {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SolverVariant::ALL.iter()
            .copied()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SolverError::UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for SolverVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Solver for SolverVariant {
    fn solve(&self, formula: &CNF, deadline: Deadline) -> SolveOutcome {
        SatisfactionSolver::new(self.config()).solve(formula, deadline)
    }
}

/// DPLL solver assembled from a [`VariantConfig`].
///
/// Every call to `solve` builds its own trail, watch lists and metrics, so
/// one solver can serve several threads at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatisfactionSolver {
    config: VariantConfig,
}

impl SatisfactionSolver {
    pub fn new(config: VariantConfig) -> SatisfactionSolver {
        SatisfactionSolver { config }
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    fn search<P: Propagator>(&self, formula: &CNF, deadline: &Deadline) -> (SearchResult, Metrics) {
        SearchEngine::<P, DLIS>::new(formula, DLIS::new(self.config.phase_saving)).run(deadline)
    }

    fn solve_with_metrics(&self, formula: &CNF, deadline: &Deadline) -> (SATSolution, Metrics) {
        let mut reconstruction = Reconstruction::new();
        let mut stats = PreprocessingStats::default();

        let simplified: Cow<CNF> = match self.config.preprocessing {
            None => Cow::Borrowed(formula),
            Some(config) => match Pipeline::new(config).run(formula, deadline) {
                PreprocessOutcome::Simplified(preprocessed) => {
                    reconstruction = preprocessed.reconstruction;
                    stats = preprocessed.stats;
                    Cow::Owned(preprocessed.formula)
                }
                PreprocessOutcome::Unsatisfiable(stats) => {
                    let metrics = Metrics { peak_memory: stats.peak_memory, preprocessing: stats, ..Metrics::default() };
                    return (SATSolution::Unsatisfiable, metrics);
                }
                PreprocessOutcome::TimedOut(stats) => {
                    let metrics = Metrics { peak_memory: stats.peak_memory, preprocessing: stats, ..Metrics::default() };
                    return (SATSolution::TimedOut, metrics);
                }
            },
        };

        let (result, mut metrics) = match self.config.propagation {
            PropagationKind::Linear => self.search::<LinearPropagator>(&simplified, deadline),
            PropagationKind::Watched => self.search::<WatchedPropagator>(&simplified, deadline),
        };
        metrics.observe_memory(stats.peak_memory);
        metrics.preprocessing = stats;

        let solution = match result {
            SearchResult::Satisfied(mut valuation) => {
                reconstruction.restore(&mut valuation);
                if !check_valuation(formula, &valuation) {
                    panic!("reconstructed assignment falsifies the input formula");
                }
                SATSolution::Satisfiable(valuation)
            }
            SearchResult::Unsatisfied => SATSolution::Unsatisfiable,
            SearchResult::TimedOut => SATSolution::TimedOut,
        };
        (solution, metrics)
    }
}

impl Solver for SatisfactionSolver {
    fn solve(&self, formula: &CNF, deadline: Deadline) -> SolveOutcome {
        let started = Instant::now();
        let (solution, mut metrics) = self.solve_with_metrics(formula, &deadline);
        metrics.wall_time = started.elapsed();
        metrics.timed_out = solution.is_timed_out();

        debug!(target: log_targets::SEARCH, "{:?}: {} in {:?}", self.config, solution.tag(), metrics.wall_time);
        SolveOutcome { solution, metrics }
    }
}
