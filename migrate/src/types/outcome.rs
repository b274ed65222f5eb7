use std::fmt;

use crate::error::MigrateError;
use crate::types::{Confirmation, RecordIdentifier};

/// Result of processing one record during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// The record was already in the checkpoint.
    Skipped,
    /// The update was confirmed and checkpointed.
    Applied(Confirmation),
    /// The update failed; the record stays pending for the next run.
    Failed(MigrateError),
    /// The update was confirmed but the checkpoint flush failed.
    ///
    /// The id stays in the run's in-memory set, so a later successful flush in the
    /// same run still persists it. Only when no such flush happens will a later run
    /// apply the update again.
    Unrecorded(Confirmation, MigrateError),
}

impl MigrationOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, MigrationOutcome::Skipped)
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, MigrationOutcome::Applied(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MigrationOutcome::Failed(_))
    }

    pub fn is_unrecorded(&self) -> bool {
        matches!(self, MigrationOutcome::Unrecorded(_, _))
    }
}

/// Per-outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub skipped: usize,
    pub applied: usize,
    pub failed: usize,
    pub unrecorded: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &MigrationOutcome) {
        match outcome {
            MigrationOutcome::Skipped => self.skipped += 1,
            MigrationOutcome::Applied(_) => self.applied += 1,
            MigrationOutcome::Failed(_) => self.failed += 1,
            MigrationOutcome::Unrecorded(_, _) => self.unrecorded += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.skipped + self.applied + self.failed + self.unrecorded
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skipped: {}, applied: {}, failed: {}, unrecorded: {}",
            self.skipped, self.applied, self.failed, self.unrecorded
        )
    }
}

/// Outcomes of a run in processing order, with their summary.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    outcomes: Vec<(RecordIdentifier, MigrationOutcome)>,
    summary: RunSummary,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: RecordIdentifier, outcome: MigrationOutcome) {
        self.summary.record(&outcome);
        self.outcomes.push((id, outcome));
    }

    pub fn outcomes(&self) -> &[(RecordIdentifier, MigrationOutcome)] {
        &self.outcomes
    }

    /// Returns the outcome of the record with `id`, if it was processed.
    pub fn outcome(&self, id: &str) -> Option<&MigrationOutcome> {
        self.outcomes
            .iter()
            .find(|(record_id, _)| record_id.as_str() == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }
}
