//! Validation lifecycle and issue resolution.
//!
//! ```text
//! idle      --begin()-->      running
//! running   --complete()-->   succeeded
//! succeeded --invalidate()--> idle
//! succeeded --begin()-->      running
//! ```
//!
//! Each `begin` hands out a [`ValidationTicket`]. Only the ticket of the most
//! recent run may complete it; completions carrying an older ticket are
//! dropped, so a superseded run can never overwrite a newer one.

use std::collections::BTreeSet;

use pos_model::{IssueId, ValidationIssue, ValidationReport, ValidationSummary};
use tracing::debug;

/// Where the current validation run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
}

impl ValidationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
        }
    }
}

/// Identifies one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidationTicket(u64);

impl ValidationTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Validation status, last report, and the set of resolved issues.
#[derive(Debug, Clone, Default)]
pub struct ValidationTracker {
    status: ValidationStatus,
    generation: u64,
    report: Option<ValidationReport>,
    resolved: BTreeSet<IssueId>,
}

impl ValidationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ValidationStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == ValidationStatus::Running
    }

    /// The report of the last successful run, if it is still current.
    pub fn report(&self) -> Option<&ValidationReport> {
        self.report.as_ref()
    }

    pub fn summary(&self) -> Option<&ValidationSummary> {
        self.report.as_ref().map(|r| &r.summary)
    }

    /// Starts a new run, superseding any run in flight.
    ///
    /// Clears the previous report and every resolution.
    pub fn begin(&mut self) -> ValidationTicket {
        self.generation += 1;
        self.status = ValidationStatus::Running;
        self.report = None;
        self.resolved.clear();
        debug!(generation = self.generation, "validation started");
        ValidationTicket(self.generation)
    }

    /// Stores the report of the run identified by `ticket`.
    ///
    /// Returns `false` and leaves the tracker untouched when the ticket is
    /// stale.
    pub fn complete(&mut self, ticket: ValidationTicket, report: ValidationReport) -> bool {
        if !self.is_current(ticket) {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "dropping stale validation result"
            );
            return false;
        }
        debug!(
            generation = ticket.0,
            issues = report.issues.len(),
            "validation succeeded"
        );
        self.status = ValidationStatus::Succeeded;
        self.report = Some(report);
        true
    }

    /// Abandons the run identified by `ticket` without a report.
    ///
    /// Used when the run was cancelled or its task failed. Stale tickets are
    /// ignored.
    pub fn abandon(&mut self, ticket: ValidationTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        debug!(generation = ticket.0, "validation abandoned");
        self.status = ValidationStatus::Idle;
        true
    }

    /// Discards all validation state after the mapping changed.
    ///
    /// Any run in flight becomes stale. Returns `true` if there was state to
    /// discard.
    pub fn invalidate(&mut self) -> bool {
        let had_state = self.status != ValidationStatus::Idle || !self.resolved.is_empty();
        self.generation += 1;
        self.status = ValidationStatus::Idle;
        self.report = None;
        self.resolved.clear();
        if had_state {
            debug!(generation = self.generation, "validation invalidated");
        }
        had_state
    }

    fn is_current(&self, ticket: ValidationTicket) -> bool {
        self.status == ValidationStatus::Running && ticket.0 == self.generation
    }

    /// Marks an issue of the current report as resolved.
    ///
    /// Summary counts are left as they are. Returns `false` for ids not in the
    /// current report.
    pub fn resolve_issue(&mut self, id: &IssueId) -> bool {
        let known = self.report.as_ref().is_some_and(|r| r.issue(id).is_some());
        if !known {
            return false;
        }
        self.resolved.insert(id.clone())
    }

    pub fn is_resolved(&self, id: &IssueId) -> bool {
        self.resolved.contains(id)
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Issues of the current report not yet resolved.
    pub fn outstanding_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.report
            .iter()
            .flat_map(|r| r.issues.iter())
            .filter(|i| !self.resolved.contains(&i.id))
    }

    /// Outstanding errors.
    pub fn blocking_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.outstanding_issues().filter(|i| i.is_error())
    }

    pub fn outstanding_warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.outstanding_issues().filter(|i| i.is_warning())
    }

    pub fn has_blocking_issues(&self) -> bool {
        self.blocking_issues().next().is_some()
    }

    pub fn has_outstanding_warnings(&self) -> bool {
        self.outstanding_warnings().next().is_some()
    }

    /// The validation step gate: a successful run with no outstanding errors.
    pub fn is_complete(&self) -> bool {
        self.status == ValidationStatus::Succeeded && !self.has_blocking_issues()
    }
}
