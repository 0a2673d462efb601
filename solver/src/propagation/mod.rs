mod linear;
mod watched;

pub use linear::LinearPropagator;
pub use watched::WatchedPropagator;

use crate::{
    Deadline, Metrics,
    dpll::Clauses,
    trail::{AssignmentTrail, ClauseId},
};

/// Result of running unit propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// No clause is unit and none is falsified
    Fixpoint,
    /// The clause has all of its literals false
    Conflict(ClauseId),
    /// The deadline passed before a fixpoint was reached
    Interrupted,
}

/// Which unit propagation scheme the search uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropagationKind {
    /// Rescan every clause until nothing changes
    Linear,
    /// Two watched literals per clause
    Watched,
}

/// Derives the consequences of the current trail.
///
/// Every assignment made by a propagator is pushed onto the trail on the
/// current level with [`Reason::Propagated`](crate::trail::Reason::Propagated)
/// and counted in `metrics.unit_propagations`.
pub trait Propagator {
    fn initialise(clauses: &Clauses, num_variables: usize) -> Self where Self: Sized;

    fn propagate(
        &mut self,
        clauses: &Clauses,
        trail: &mut AssignmentTrail,
        metrics: &mut Metrics,
        deadline: &Deadline,
    ) -> Propagation;

    /// Called after the trail has been cut down to `trail_len` entries.
    fn on_undo(&mut self, _trail_len: usize) {}

    /// Bytes held by the propagator's own structures
    fn footprint(&self) -> usize { 0 }
}
