use std::fmt;
use std::time::Duration;

/// Counters of a single solve.
///
/// A fresh record is created when a solve starts and handed back together
/// with the verdict; nothing is shared between solves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Literals chosen by the branching heuristic
    pub decisions: u64,
    /// Entries into the backtracking state
    pub backtracks: u64,
    /// Trail pushes caused by a unit clause during the search. Units fixed
    /// by preprocessing are counted in [`PreprocessingStats::units_fixed`].
    pub unit_propagations: u64,
    /// Clauses found with all literals false
    pub conflicts: u64,
    /// High-water mark, in bytes, of the solve-local data structures
    pub peak_memory: usize,
    pub wall_time: Duration,
    pub timed_out: bool,
    pub preprocessing: PreprocessingStats,
}

/// What the preprocessing pipeline did to the formula.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessingStats {
    /// Completed cycles over all passes
    pub rounds: u64,
    pub units_fixed: u64,
    pub pure_literals: u64,
    pub tautologies_removed: u64,
    pub clauses_subsumed: u64,
    pub variables_eliminated: u64,
    /// Elimination candidates rejected by the size or growth bound
    pub bve_skipped: u64,
    /// High-water mark, in bytes, of the working clause database
    pub peak_memory: usize,
}

impl Metrics {
    pub(crate) fn observe_memory(&mut self, bytes: usize) {
        self.peak_memory = self.peak_memory.max(bytes);
    }

    /// DIMACS comment lines, one per counter
    pub fn to_dimacs_comment(&self) -> String {
        self.to_string()
            .lines()
            .map(|line| format!("c {}\n", line))
            .collect()
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "decisions: {}", self.decisions)?;
        writeln!(f, "backtracks: {}", self.backtracks)?;
        writeln!(f, "unit_propagations: {}", self.unit_propagations)?;
        writeln!(f, "conflicts: {}", self.conflicts)?;
        writeln!(f, "peak_memory: {} bytes", self.peak_memory)?;
        writeln!(f, "wall_time: {:.6}s", self.wall_time.as_secs_f64())?;
        writeln!(f, "timed_out: {}", self.timed_out)?;
        write!(f, "{}", self.preprocessing)
    }
}

impl fmt::Display for PreprocessingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "preprocessing_rounds: {}", self.rounds)?;
        writeln!(f, "units_fixed: {}", self.units_fixed)?;
        writeln!(f, "pure_literals: {}", self.pure_literals)?;
        writeln!(f, "tautologies_removed: {}", self.tautologies_removed)?;
        writeln!(f, "clauses_subsumed: {}", self.clauses_subsumed)?;
        writeln!(f, "variables_eliminated: {}", self.variables_eliminated)?;
        writeln!(f, "bve_skipped: {}", self.bve_skipped)?;
        writeln!(f, "preprocessing_peak_memory: {} bytes", self.peak_memory)
    }
}
