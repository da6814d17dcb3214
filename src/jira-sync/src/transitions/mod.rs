//! Workflow transitions.
//!
//! Each issue is walked through the configured [`TransitionChain`] up to the
//! target selected by the triggering event. Jira decides which transitions
//! are legal from the current state, so the available set is fetched again
//! before every link.

mod chain;
mod outcome;
mod trigger;

pub use chain::{select_transition, TransitionChain};
pub use outcome::{TransitionOutcome, TransitionReport};
pub use trigger::{EventTrigger, TransitionTargets};

use crate::jira::{ApiVersion, IssueQuery, JiraApi};
use crate::keys::IssueKey;
use crate::record::IssueRecord;
use tracing::{debug, info, info_span, warn, Instrument};

/// Applies the transition chain to issues, one at a time.
pub struct TransitionEngine<'a> {
    jira: &'a dyn JiraApi,
    chain: &'a TransitionChain,
}

impl<'a> TransitionEngine<'a> {
    /// Creates an engine walking `chain` against `jira`.
    #[must_use]
    pub fn new(jira: &'a dyn JiraApi, chain: &'a TransitionChain) -> Self {
        Self { jira, chain }
    }

    /// Walks `record` toward `target` and refreshes its status from Jira.
    ///
    /// Never fails: Jira errors are recorded in the returned report. The
    /// status is read back even when no transition was applied.
    pub async fn advance(
        &self,
        record: &mut IssueRecord,
        target: Option<&str>,
    ) -> TransitionReport {
        let span = info_span!("transition", key = %record.key());

        async {
            let mut report = TransitionReport {
                key: record.key().to_string(),
                target: target.map(str::to_string),
                ..Default::default()
            };

            match target.and_then(|target| self.chain.links_before(target)) {
                Some(links) => {
                    debug!(links = links.len(), "Walking transition chain");
                    self.walk(record.key(), links, &mut report.outcomes).await;
                }
                None => debug!(target = ?target, "Target not in chain, no transitions to apply"),
            }

            self.refresh_status(record, &mut report).await;
            report
        }
        .instrument(span)
        .await
    }

    async fn walk(&self, key: &IssueKey, links: &[String], outcomes: &mut Vec<TransitionOutcome>) {
        for link in links {
            let available = match self.jira.get_issue_transitions(key).await {
                Ok(available) => available,
                Err(e) => {
                    warn!(link = %link, error = %e, "Failed to list transitions");
                    outcomes.push(TransitionOutcome::Failed {
                        link: link.clone(),
                        error: e.to_string(),
                    });
                    return;
                }
            };

            let Some(transition) = select_transition(&available, link) else {
                debug!(link = %link, "No available transition matches link, skipping");
                outcomes.push(TransitionOutcome::Skipped { link: link.clone() });
                continue;
            };

            match self.jira.transition_issue(key, &transition.id).await {
                Ok(()) => {
                    info!(
                        link = %link,
                        id = %transition.id,
                        name = %transition.name,
                        "Applied transition"
                    );
                    outcomes.push(TransitionOutcome::Applied {
                        link: link.clone(),
                        id: transition.id.clone(),
                        name: transition.name.clone(),
                    });
                }
                Err(e) => {
                    warn!(
                        link = %link,
                        id = %transition.id,
                        error = %e,
                        "Failed to apply transition"
                    );
                    outcomes.push(TransitionOutcome::Failed {
                        link: link.clone(),
                        error: e.to_string(),
                    });
                    return;
                }
            }
        }
    }

    async fn refresh_status(&self, record: &mut IssueRecord, report: &mut TransitionReport) {
        let query = IssueQuery::fields(&["status"]);
        match self.jira.get_issue(record.key(), &query, ApiVersion::V2).await {
            Ok(Some(issue)) => {
                if let Some(status) = issue.fields.status {
                    record.status = status.name;
                    if let Some(category) = status.status_category {
                        record.status_category = category.name;
                    }
                }
                info!(status = %record.status, "Jira status");
                report.final_status = Some(record.status.clone());
            }
            Ok(None) => {
                warn!("Issue disappeared while reading back its status");
                report.status_error = Some("issue not found".to_string());
            }
            Err(e) => {
                warn!(error = %e, "Failed to read back issue status");
                report.status_error = Some(e.to_string());
            }
        }
    }
}
