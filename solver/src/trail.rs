use std::mem::size_of;

use crate::cnf::{CNFVar, VarId};

/// Index of a clause in the formula handed to the search
pub type ClauseId = usize;

/// Why a variable holds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Chosen by the branching heuristic; the opposite branch is still open
    Decision,
    /// Forced by the clause, all of whose other literals were false
    Propagated(ClauseId),
    /// Second branch of a decision; nothing is left to explore at its level
    NegatedDecision,
}

impl Reason {
    /// Whether the entry opens a decision level
    pub fn is_branch(&self) -> bool {
        !matches!(self, Reason::Propagated(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailEntry {
    pub literal: CNFVar,
    pub level: usize,
    pub reason: Reason,
}

/// Undoable stack of assignments.
///
/// Entries are pushed in non-decreasing level order. Every level above zero
/// starts with exactly one branch entry (a decision or a negated decision).
pub struct AssignmentTrail {
    values: Vec<Option<bool>>,
    saved_phases: Vec<Option<bool>>,
    entries: Vec<TrailEntry>,
    /// Position in `entries` of the branch entry of each level
    level_starts: Vec<usize>,
}

impl AssignmentTrail {
    pub fn new(num_variables: usize) -> AssignmentTrail {
        AssignmentTrail {
            values: vec![None; num_variables + 1],
            saved_phases: vec![None; num_variables + 1],
            entries: Vec::with_capacity(num_variables),
            level_starts: Vec::new(),
        }
    }

    /// Assigns `literal` true.
    ///
    /// Branch entries must open `current_level() + 1`, propagations stay on
    /// the current level.
    pub fn push(&mut self, literal: CNFVar, level: usize, reason: Reason) {
        debug_assert!(self.values[literal.id].is_none(), "variable {} assigned twice", literal.id);
        if reason.is_branch() {
            debug_assert_eq!(level, self.current_level() + 1);
            self.level_starts.push(self.entries.len());
        } else {
            debug_assert_eq!(level, self.current_level());
        }

        self.values[literal.id] = Some(literal.sign);
        self.saved_phases[literal.id] = Some(literal.sign);
        self.entries.push(TrailEntry { literal, level, reason });
    }

    /// Unassigns every entry whose level is at least `level`, newest first.
    /// Returns how many entries were removed.
    pub fn undo_to(&mut self, level: usize) -> usize {
        if level > self.current_level() {
            return 0;
        }
        let start = match level {
            0 => 0,
            _ => self.level_starts[level - 1],
        };
        self.level_starts.truncate(level.saturating_sub(1));

        let removed = self.entries.len() - start;
        for entry in self.entries.drain(start..).rev() {
            self.values[entry.literal.id] = None;
        }
        removed
    }

    /// Number of open decision levels
    #[inline]
    pub fn current_level(&self) -> usize {
        self.level_starts.len()
    }

    /// The branch entry of the current level, `None` on level zero
    pub fn last_branch(&self) -> Option<TrailEntry> {
        self.level_starts.last().map(|&position| self.entries[position])
    }

    #[inline]
    pub fn value(&self, variable: VarId) -> Option<bool> {
        self.values[variable]
    }

    /// `Some(true)` if the literal is satisfied, `Some(false)` if falsified
    #[inline]
    pub fn literal_value(&self, literal: CNFVar) -> Option<bool> {
        self.values[literal.id].map(|value| value == literal.sign)
    }

    /// Polarity the variable held the last time it was assigned
    pub fn saved_phase(&self, variable: VarId) -> Option<bool> {
        self.saved_phases[variable]
    }

    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn num_variables(&self) -> usize {
        self.values.len() - 1
    }

    /// Bytes currently held by the trail
    pub fn footprint(&self) -> usize {
        self.entries.capacity() * size_of::<TrailEntry>()
            + self.values.len() * 2 * size_of::<Option<bool>>()
            + self.level_starts.capacity() * size_of::<usize>()
    }

    /// Values of variables `1..=n`, `None` where unassigned
    pub fn values(&self) -> &[Option<bool>] {
        &self.values[1..]
    }
}
