//! Run summary types.

use crate::transitions::TransitionReport;
use serde::Serialize;

/// Counters for a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Distinct keys found in the scanned text.
    pub keys_found: usize,

    /// Keys that resolved to an existing Jira issue.
    pub issues_resolved: usize,

    /// Keys Jira does not know about.
    pub issues_missing: usize,

    /// Transitions applied across all issues.
    pub transitions_applied: usize,

    /// Chain links skipped for lack of a matching transition.
    pub transitions_skipped: usize,

    /// Issues whose transition walk or status read-back failed.
    pub transitions_failed: usize,

    /// Issues mirrored into GitHub.
    pub issues_mirrored: usize,

    /// Whether the pull request was updated.
    pub pull_request_updated: bool,
}

impl RunSummary {
    /// Folds one issue's transition report into the counters.
    pub fn record_transitions(&mut self, report: &TransitionReport) {
        self.transitions_applied += report.applied();
        self.transitions_skipped += report.skipped();
        if report.has_failures() {
            self.transitions_failed += 1;
        }
    }

    /// Returns true if any transition failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.transitions_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions::TransitionOutcome;

    #[test]
    fn folds_transition_reports() {
        let mut summary = RunSummary::default();

        summary.record_transitions(&TransitionReport {
            key: "API-1".to_string(),
            target: Some("Done".to_string()),
            outcomes: vec![
                TransitionOutcome::Applied {
                    link: "Start".to_string(),
                    id: "11".to_string(),
                    name: "Start".to_string(),
                },
                TransitionOutcome::Skipped {
                    link: "Review".to_string(),
                },
            ],
            final_status: Some("In Progress".to_string()),
            status_error: None,
        });
        assert_eq!(summary.transitions_applied, 1);
        assert_eq!(summary.transitions_skipped, 1);
        assert!(!summary.has_failures());

        summary.record_transitions(&TransitionReport {
            key: "API-2".to_string(),
            status_error: Some("timeout".to_string()),
            ..Default::default()
        });
        assert_eq!(summary.transitions_failed, 1);
        assert!(summary.has_failures());
    }
}
