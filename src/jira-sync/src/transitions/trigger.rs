//! Mapping from GitHub events to transition targets.

use crate::github::GithubEvent;
use serde::Serialize;

/// The GitHub events that can drive issues toward a configured state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventTrigger {
    /// A branch was created.
    NewBranch,
    /// A pull request was opened.
    PrOpen,
    /// A pull request review approved the change.
    PrApproval,
    /// A pull request was merged.
    PrMerge,
}

impl EventTrigger {
    /// Classifies the event, or returns `None` when it triggers nothing.
    #[must_use]
    pub fn detect(event_name: &str, event: &GithubEvent) -> Option<Self> {
        match event_name {
            "pull_request" => {
                let merged = event
                    .pull_request
                    .as_ref()
                    .and_then(|pr| pr.merged)
                    .unwrap_or(false);
                match event.action.as_deref() {
                    Some("closed") if merged => Some(Self::PrMerge),
                    Some("opened") => Some(Self::PrOpen),
                    _ => None,
                }
            }
            "pull_request_review" => event
                .review
                .as_ref()
                .filter(|review| review.state.eq_ignore_ascii_case("approved"))
                .map(|_| Self::PrApproval),
            "create" => match event.ref_type.as_deref() {
                None | Some("branch") => Some(Self::NewBranch),
                Some(_) => None,
            },
            _ => None,
        }
    }
}

/// Target state configured for each trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTargets {
    pub on_new_branch: Option<String>,
    pub on_pr_open: Option<String>,
    pub on_pr_approval: Option<String>,
    pub on_pr_merge: Option<String>,
}

impl TransitionTargets {
    /// The configured target for `trigger`; blank values count as unset.
    #[must_use]
    pub fn target_for(&self, trigger: EventTrigger) -> Option<&str> {
        let target = match trigger {
            EventTrigger::NewBranch => &self.on_new_branch,
            EventTrigger::PrOpen => &self.on_pr_open,
            EventTrigger::PrApproval => &self.on_pr_approval,
            EventTrigger::PrMerge => &self.on_pr_merge,
        };
        target
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> GithubEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn detects_merged_pull_request() {
        let merged = event(json!({
            "action": "closed",
            "pull_request": { "number": 1, "title": "t", "merged": true }
        }));
        assert_eq!(
            EventTrigger::detect("pull_request", &merged),
            Some(EventTrigger::PrMerge)
        );

        let closed = event(json!({
            "action": "closed",
            "pull_request": { "number": 1, "title": "t", "merged": false }
        }));
        assert_eq!(EventTrigger::detect("pull_request", &closed), None);
    }

    #[test]
    fn detects_opened_pull_request() {
        let opened = event(json!({
            "action": "opened",
            "pull_request": { "number": 1, "title": "t" }
        }));
        assert_eq!(
            EventTrigger::detect("pull_request", &opened),
            Some(EventTrigger::PrOpen)
        );

        let edited = event(json!({ "action": "edited" }));
        assert_eq!(EventTrigger::detect("pull_request", &edited), None);
    }

    #[test]
    fn detects_approval_review() {
        let approved = event(json!({ "action": "submitted", "review": { "state": "approved" } }));
        assert_eq!(
            EventTrigger::detect("pull_request_review", &approved),
            Some(EventTrigger::PrApproval)
        );

        let commented = event(json!({ "review": { "state": "commented" } }));
        assert_eq!(EventTrigger::detect("pull_request_review", &commented), None);
    }

    #[test]
    fn detects_branch_creation_only() {
        let branch = event(json!({ "ref": "feature/API-1", "ref_type": "branch" }));
        assert_eq!(
            EventTrigger::detect("create", &branch),
            Some(EventTrigger::NewBranch)
        );

        let tag = event(json!({ "ref": "v1.0.0", "ref_type": "tag" }));
        assert_eq!(EventTrigger::detect("create", &tag), None);
        assert_eq!(EventTrigger::detect("push", &branch), None);
    }

    #[test]
    fn blank_targets_are_unset() {
        let targets = TransitionTargets {
            on_pr_open: Some("In Review".to_string()),
            on_pr_merge: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(targets.target_for(EventTrigger::PrOpen), Some("In Review"));
        assert_eq!(targets.target_for(EventTrigger::PrMerge), None);
        assert_eq!(targets.target_for(EventTrigger::NewBranch), None);
    }
}
