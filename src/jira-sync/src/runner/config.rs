//! Runner configuration.

use crate::github::{GithubEvent, Refs, SearchSource};
use crate::transitions::{TransitionChain, TransitionTargets};

/// Everything a run needs besides the API clients.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// `GITHUB_EVENT_NAME`, e.g. `pull_request`.
    pub(super) event_name: String,
    /// Parsed event payload.
    pub(super) event: GithubEvent,
    /// Jira site URL used for browse links.
    pub(super) jira_url: String,
    /// Fix version injected into records and used as the milestone title.
    pub(super) fix_version: Option<String>,
    pub(super) chain: TransitionChain,
    pub(super) targets: TransitionTargets,
    /// Whether merge commit messages contribute keys.
    pub(super) include_merge_messages: bool,
    /// Whether the pull request title is rewritten with the found keys.
    pub(super) standardize_pr_title: bool,
    /// Free-form text to look up instead of scanning the commit range.
    pub(super) search_string: Option<String>,
    /// Event field searched when the commit range yields nothing.
    pub(super) search_source: SearchSource,
    /// Explicit head/base refs.
    pub(super) ref_overrides: Refs,
    /// Custom release notes line template.
    pub(super) release_notes_template: Option<String>,
}

impl RunnerConfig {
    /// Creates a configuration for `event_name` with every option off.
    pub fn new(
        event_name: impl Into<String>,
        event: GithubEvent,
        jira_url: impl Into<String>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            event,
            jira_url: jira_url.into(),
            fix_version: None,
            chain: TransitionChain::default(),
            targets: TransitionTargets::default(),
            include_merge_messages: false,
            standardize_pr_title: false,
            search_string: None,
            search_source: SearchSource::default(),
            ref_overrides: Refs::default(),
            release_notes_template: None,
        }
    }

    /// Sets the target fix version. Blank values are ignored.
    pub fn with_fix_version(mut self, fix_version: Option<String>) -> Self {
        self.fix_version = fix_version.filter(|version| !version.trim().is_empty());
        self
    }

    pub fn with_transition_chain(mut self, chain: TransitionChain) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_transition_targets(mut self, targets: TransitionTargets) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_merge_messages(mut self, include: bool) -> Self {
        self.include_merge_messages = include;
        self
    }

    pub fn with_pr_title_standardization(mut self, enabled: bool) -> Self {
        self.standardize_pr_title = enabled;
        self
    }

    /// Sets the free-form search string. Blank values are ignored.
    pub fn with_search_string(mut self, search_string: Option<String>) -> Self {
        self.search_string = search_string.filter(|text| !text.trim().is_empty());
        self
    }

    pub fn with_search_source(mut self, source: SearchSource) -> Self {
        self.search_source = source;
        self
    }

    pub fn with_ref_overrides(mut self, refs: Refs) -> Self {
        self.ref_overrides = refs;
        self
    }

    pub fn with_release_notes_template(mut self, template: Option<String>) -> Self {
        self.release_notes_template = template;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_options_are_unset() {
        let config = RunnerConfig::new("push", GithubEvent::default(), "https://acme.atlassian.net")
            .with_fix_version(Some(" ".to_string()))
            .with_search_string(Some(String::new()));

        assert_eq!(config.fix_version, None);
        assert_eq!(config.search_string, None);
        assert_eq!(config.event_name, "push");
    }
}
