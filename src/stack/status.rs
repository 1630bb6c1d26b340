// ABOUTME: Closed classification of provider stack statuses.
// ABOUTME: Anything outside the expected in-progress/complete set is a failure.

use std::fmt;

/// Provisioning state of a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackStatus {
    /// The stack does not exist.
    Absent,
    CreateInProgress,
    UpdateInProgress,
    CreateComplete,
    UpdateComplete,
    /// Update finished, old resources are being removed.
    CleanupInProgress,
    /// Any other provider status (rollbacks, failed creates, deletes),
    /// carrying the raw status string.
    Failed(String),
}

impl StackStatus {
    pub fn from_provider(status: &str) -> Self {
        match status {
            "CREATE_IN_PROGRESS" => StackStatus::CreateInProgress,
            "UPDATE_IN_PROGRESS" => StackStatus::UpdateInProgress,
            "CREATE_COMPLETE" => StackStatus::CreateComplete,
            "UPDATE_COMPLETE" => StackStatus::UpdateComplete,
            "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS" => StackStatus::CleanupInProgress,
            other => StackStatus::Failed(other.to_string()),
        }
    }

    /// Terminal statuses end polling.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StackStatus::CreateComplete | StackStatus::UpdateComplete | StackStatus::Failed(_)
        )
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            StackStatus::CreateInProgress
                | StackStatus::UpdateInProgress
                | StackStatus::CleanupInProgress
        )
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StackStatus::CreateComplete | StackStatus::UpdateComplete)
    }

    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::Absent => "ABSENT",
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::CleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            StackStatus::Failed(raw) => raw,
        }
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_is_failure() {
        let status = StackStatus::from_provider("ROLLBACK_COMPLETE");
        assert_eq!(status, StackStatus::Failed("ROLLBACK_COMPLETE".to_string()));
        assert!(status.is_terminal());
        assert!(!status.is_success());
    }

    #[test]
    fn cleanup_keeps_polling() {
        let status = StackStatus::from_provider("UPDATE_COMPLETE_CLEANUP_IN_PROGRESS");
        assert!(status.is_in_progress());
        assert!(!status.is_terminal());
    }

    #[test]
    fn absent_is_neither_terminal_nor_in_progress() {
        assert!(!StackStatus::Absent.is_terminal());
        assert!(!StackStatus::Absent.is_in_progress());
    }

    #[test]
    fn display_round_trips_provider_strings() {
        for raw in ["CREATE_COMPLETE", "UPDATE_IN_PROGRESS", "DELETE_FAILED"] {
            assert_eq!(StackStatus::from_provider(raw).to_string(), raw);
        }
    }
}
