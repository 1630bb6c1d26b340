// ABOUTME: Diagnostics accumulator for non-fatal warnings during a release.
// ABOUTME: Collects outcomes that do not fail the run but should be shown to users.

use crate::prune::PruneOutcome;
use crate::release::{CutoverReport, InvalidationOutcome};

/// Collects non-fatal warnings during release operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    /// Record the non-fatal parts of a cutover.
    pub fn record_cutover(&mut self, report: &CutoverReport) {
        if let InvalidationOutcome::Failed(reason) = &report.invalidation {
            self.warn(Warning::invalidation_failed(format!(
                "cache invalidation for {} failed, edges will refresh on expiry: {}",
                report.distribution, reason
            )));
        }
        if report.attempts > 1 {
            self.warn(Warning::cutover_retried(format!(
                "distribution {} changed concurrently, cutover took {} attempts",
                report.distribution, report.attempts
            )));
        }
    }

    pub fn record_prune(&mut self, outcome: &PruneOutcome) {
        if let PruneOutcome::Skipped { found, required } = outcome {
            self.warn(Warning::prune_skipped(format!(
                "pruning skipped: {} versions present, at least {} required",
                found, required
            )));
        }
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a release.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn invalidation_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::InvalidationFailed,
            message: message.into(),
        }
    }

    pub fn cutover_retried(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CutoverRetried,
            message: message.into(),
        }
    }

    pub fn prune_skipped(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PruneSkipped,
            message: message.into(),
        }
    }

    pub fn redeploy(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Redeploy,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Cutover succeeded but edge caches were not purged.
    InvalidationFailed,
    /// The distribution config changed underneath us at least once.
    CutoverRetried,
    /// Too few versions to prune.
    PruneSkipped,
    /// An existing version prefix was uploaded again.
    Redeploy,
}
