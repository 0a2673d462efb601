//! Targets passed to the [`log`] macros throughout the crate.
//!
//! No logger is installed by the library; binaries pick one.

/// Decisions, backtracks and verdicts of the search
pub const SEARCH: &str = "search";

/// Unit propagation during the search
pub const PROPAGATION: &str = "propagation";

/// Passes of the preprocessing pipeline
pub const PREPROCESSING: &str = "preprocessing";

/// Rebuilding values of variables removed by preprocessing
pub const RECONSTRUCTION: &str = "reconstruction";
