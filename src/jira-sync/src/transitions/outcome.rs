//! Transition outcome types.

use serde::Serialize;

/// What happened to a single chain link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// A matching transition was applied.
    Applied {
        /// Chain link being walked.
        link: String,
        /// Applied transition id.
        id: String,
        /// Applied transition name.
        name: String,
    },

    /// No available transition matched the link.
    Skipped {
        /// Chain link being walked.
        link: String,
    },

    /// Listing or applying transitions failed; remaining links were abandoned.
    Failed {
        /// Chain link being walked.
        link: String,
        /// Error message.
        error: String,
    },
}

impl TransitionOutcome {
    /// Returns the status as a string for logging and summaries.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied { .. } => "applied",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Everything the engine did for one issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransitionReport {
    /// Issue key.
    pub key: String,

    /// Target state for this run, if the trigger selected one.
    pub target: Option<String>,

    /// Outcome per walked link, in chain order.
    pub outcomes: Vec<TransitionOutcome>,

    /// Status read back from Jira after the walk.
    pub final_status: Option<String>,

    /// Error raised while reading the status back.
    pub status_error: Option<String>,
}

impl TransitionReport {
    /// Number of transitions applied.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, TransitionOutcome::Applied { .. }))
    }

    /// Number of links skipped for lack of a match.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TransitionOutcome::Skipped { .. }))
    }

    /// Returns true if a Jira call failed during the walk or the read-back.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.status_error.is_some()
            || self
                .outcomes
                .iter()
                .any(|o| matches!(o, TransitionOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&TransitionOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o)).count()
    }
}
