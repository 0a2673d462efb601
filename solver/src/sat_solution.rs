use itertools::Itertools;

use crate::Metrics;

/// Truth values of variables `1..=n`, stored at indices `0..n`
pub type Valuation = Vec<bool>;

const MAX_LITERALS_PER_LINE: usize = 8;

#[derive(Clone, PartialEq, Eq)]
pub enum SATSolution {
    Satisfiable(Valuation),
    Unsatisfiable,
    /// The deadline expired before a verdict was reached
    TimedOut,
}

/// Verdict of a solve together with the counters it accumulated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub solution: SATSolution,
    pub metrics: Metrics,
}

impl std::iter::FromIterator<bool> for SATSolution {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        SATSolution::Satisfiable(iter.into_iter().collect())
    }
}

impl SATSolution {
    pub fn is_sat(&self) -> bool {
        matches!(self, SATSolution::Satisfiable(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SATSolution::Unsatisfiable)
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, SATSolution::TimedOut)
    }

    pub fn valuation(&self) -> Option<&Valuation> {
        match self {
            SATSolution::Satisfiable(valuation) => Some(valuation),
            _ => None,
        }
    }

    /// Short verdict tag: `SAT`, `UNSAT` or `TIMEOUT`
    pub fn tag(&self) -> &'static str {
        match self {
            SATSolution::Satisfiable(_) => "SAT",
            SATSolution::Unsatisfiable => "UNSAT",
            SATSolution::TimedOut => "TIMEOUT",
        }
    }

    pub fn to_dimacs(&self) -> String {
        match self {
            SATSolution::Unsatisfiable => "s UNSATISFIABLE\n".to_string(),
            SATSolution::TimedOut => "s UNKNOWN\n".to_string(),
            SATSolution::Satisfiable(variables) => {
                let mut out = String::from("s SATISFIABLE\n");
                for chunk in &variables.iter().enumerate().chunks(MAX_LITERALS_PER_LINE) {
                    out.push_str("v ");
                    for (id, sign) in chunk {
                        out.push_str(&format!("{}{} ", if *sign { "" } else { "-" }, id + 1));
                    }
                    out.push_str("0\n");
                }
                if variables.is_empty() {
                    out.push_str("v 0\n");
                }
                out
            }
        }
    }
}

impl std::fmt::Debug for SATSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

impl std::fmt::Display for SATSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SATSolution::Unsatisfiable => write!(f, "Unsatisfiable"),
            SATSolution::TimedOut => write!(f, "Timed out"),
            SATSolution::Satisfiable(variables) => {
                writeln!(f, "Satisfiable:")?;
                for chunk in &variables.iter().enumerate().chunks(MAX_LITERALS_PER_LINE) {
                    let line = chunk
                        .map(|(id, sign)| format!("{}{}", if *sign { " " } else { "-" }, id + 1))
                        .join(" ");
                    writeln!(f, "{}", line)?;
                }
                Ok(())
            }
        }
    }
}
