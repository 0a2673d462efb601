use std::path::PathBuf;
use std::time::Duration;

use dpll::{SatisfactionSolver, SolverVariant, VariantConfig};

pub struct Config {
    pub input:       Option<PathBuf>,
    pub output:      Option<PathBuf>,
    pub return_code: bool,
    pub metrics:     bool,
    pub timeout:     Option<Duration>,
    pub bve_limit:   Option<usize>,
    pub variants:    Vec<SolverVariant>,
}

impl Config {
    /// Composition of `variant` with the limits given on the command line
    pub fn solver(&self, variant: SolverVariant) -> SatisfactionSolver {
        let mut config: VariantConfig = variant.config();
        if let (Some(limit), Some(preprocessing)) = (self.bve_limit, config.preprocessing.as_mut()) {
            preprocessing.bve_max_resolvent_len = limit;
        }
        SatisfactionSolver::new(config)
    }
}
