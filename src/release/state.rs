// ABOUTME: Release state marker types for the type state pattern.
// ABOUTME: Cutover is only reachable from a state that proves every upload finished.

use super::cutover::CutoverReport;

/// Initial state: version checked against storage, nothing uploaded yet.
/// Available actions: `upload()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Planned;

/// Uploaded: every artifact of the build is in storage under the version prefix.
/// Available actions: `cutover()`
#[derive(Debug, Clone, Copy)]
pub struct Uploaded {
    pub(crate) files: usize,
}

impl Uploaded {
    pub fn files(&self) -> usize {
        self.files
    }
}

/// Live: the CDN origin points at the version prefix.
/// Available actions: `report()`, `finish()`
#[derive(Debug, Clone)]
pub struct Live {
    pub(crate) files: usize,
    pub(crate) report: CutoverReport,
}
