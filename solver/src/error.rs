use thiserror::Error;

/// Errors raised while building or reading a formula.
///
/// Solving never fails: running out of time is reported as
/// [`SATSolution::TimedOut`](crate::SATSolution::TimedOut).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// A literal is zero or refers to a variable above the declared count.
    #[error("invalid formula: literal {literal} in clause {clause} is out of range 1..={num_variables}")]
    InvalidFormula {
        clause: usize,
        literal: i64,
        num_variables: usize,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("only CNF formulae are supported")]
    UnsupportedInstance,

    #[error("unknown solver variant `{0}`")]
    UnknownVariant(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;
