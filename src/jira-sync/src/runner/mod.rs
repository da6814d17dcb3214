//! Orchestrates a sync run.
//!
//! A run scans the commit range for issue keys, resolves them against Jira,
//! walks each issue through the transition chain, mirrors it into GitHub and
//! finally rewrites the pull request. When the range yields nothing, a single
//! ad-hoc lookup on event text is attempted instead.

mod config;
mod error;
mod outcome;

pub use config::RunnerConfig;
pub use error::RunnerError;
pub use outcome::{RunOutcome, RunReport};

use crate::github::{GithubApi, GithubMirror, PullRequestUpdate, Refs};
use crate::jira::{ApiVersion, IssueQuery, JiraApi};
use crate::keys::{collect_keys, extract_keys, IssueKey, KeySources};
use crate::merge::{merge_region, END_TOKEN, START_TOKEN};
use crate::record::{normalize, IssueRecord};
use crate::summary::RunSummary;
use crate::templates::{standardize_pr_title, ReleaseNotesRenderer, TitleOutcome};
use crate::transitions::{EventTrigger, TransitionEngine};
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};

/// Fields fetched from the v2 API to complement the v3 payload.
const V2_FIELDS: &[&str] = &["description", "fixVersions", "sprint"];

/// Runs one sync against injected Jira and GitHub clients.
pub struct Runner {
    config: RunnerConfig,
    jira: Arc<dyn JiraApi>,
    github: Arc<dyn GithubApi>,
    renderer: ReleaseNotesRenderer,
}

impl Runner {
    /// Builds a runner.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if the release notes template is invalid.
    pub fn new(
        config: RunnerConfig,
        jira: Arc<dyn JiraApi>,
        github: Arc<dyn GithubApi>,
    ) -> Result<Self, RunnerError> {
        let renderer =
            ReleaseNotesRenderer::new(&config.jira_url, config.release_notes_template.as_deref())?;
        Ok(Self {
            config,
            jira,
            github,
            renderer,
        })
    }

    /// Executes the full flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when Jira fails while resolving keys or GitHub
    /// fails at any point. Transition failures are reported, not raised.
    pub async fn run(&self) -> Result<RunOutcome, RunnerError> {
        if let Some(text) = &self.config.search_string {
            info!("Looking up issue in provided string");
            return self.lookup(text).await;
        }

        let keys = self.discover_keys().await?;
        let mut summary = RunSummary {
            keys_found: keys.len(),
            ..Default::default()
        };

        let mut records = self.resolve_records(&keys, &mut summary).await?;
        if records.is_empty() {
            return self.fallback().await;
        }

        let trigger = EventTrigger::detect(&self.config.event_name, &self.config.event);
        let target = trigger.and_then(|trigger| self.config.targets.target_for(trigger));
        info!(trigger = ?trigger, target = ?target, "Resolved transition target");

        let engine = TransitionEngine::new(self.jira.as_ref(), &self.config.chain);
        let mirror = GithubMirror::new(self.github.as_ref());
        let mut transitions = Vec::with_capacity(records.len());

        for record in &mut records {
            let report = engine.advance(record, target).await;
            summary.record_transitions(&report);
            transitions.push(report);

            mirror
                .mirror_record(record, self.config.fix_version.as_deref())
                .await?;
            summary.issues_mirrored += 1;
        }

        let release_notes = self.renderer.release_notes(&records)?;
        let title = self.update_pull_request(&records, &mut summary).await?;

        info!(
            keys = ?records.iter().map(|r| r.key().as_str()).collect::<Vec<_>>(),
            github = ?records.iter().filter_map(IssueRecord::gh_number).collect::<Vec<_>>(),
            "Sync complete"
        );

        Ok(RunOutcome::Linked(RunReport {
            records,
            transitions,
            release_notes,
            title,
            summary,
        }))
    }

    /// Collects keys from the PR title, head ref and compared commits.
    async fn discover_keys(&self) -> Result<Vec<IssueKey>, RunnerError> {
        let mut refs =
            Refs::from_event(&self.config.event).with_overrides(&self.config.ref_overrides);
        if refs.needs_release_base(&self.config.event_name) {
            refs.base = self.github.latest_release_tag().await?;
            debug!(base = ?refs.base, "Using latest release as base");
        }

        let Some((base, head)) = refs.range() else {
            info!("Base ref and head ref not found, skipping commit scan");
            return Ok(Vec::new());
        };

        info!(base, head, "Scanning commits");
        let messages = self.github.compare_commits(base, head).await?;
        let sources = KeySources {
            pr_title: self
                .config
                .event
                .pull_request
                .as_ref()
                .map(|pr| pr.title.as_str()),
            head_ref: Some(head),
            commit_messages: messages.iter().map(String::as_str).collect(),
        };

        let keys = collect_keys(&sources, self.config.include_merge_messages);
        info!(count = keys.len(), keys = ?keys, "Unique keys");
        Ok(keys)
    }

    /// Fetches and normalizes each key; keys unknown to Jira are dropped.
    async fn resolve_records(
        &self,
        keys: &[IssueKey],
        summary: &mut RunSummary,
    ) -> Result<Vec<IssueRecord>, RunnerError> {
        let mut records = Vec::with_capacity(keys.len());

        for key in keys {
            let span = info_span!("resolve", key = %key);
            match self.resolve_record(key).instrument(span).await? {
                Some(record) => {
                    summary.issues_resolved += 1;
                    records.push(record);
                }
                None => summary.issues_missing += 1,
            }
        }

        Ok(records)
    }

    async fn resolve_record(&self, key: &IssueKey) -> Result<Option<IssueRecord>, RunnerError> {
        let Some(v3) = self
            .jira
            .get_issue(key, &IssueQuery::default(), ApiVersion::V3)
            .await?
        else {
            info!("Issue not found in Jira, skipping");
            return Ok(None);
        };

        let v2 = self
            .jira
            .get_issue(key, &IssueQuery::fields(V2_FIELDS), ApiVersion::V2)
            .await?;
        Ok(Some(normalize(
            &v3,
            v2.as_ref(),
            self.config.fix_version.as_deref(),
        )))
    }

    /// Ad-hoc lookup on text taken from the event.
    async fn fallback(&self) -> Result<RunOutcome, RunnerError> {
        match self.config.event.search_text(self.config.search_source) {
            Some(text) => {
                info!(
                    source = ?self.config.search_source,
                    "No issues in commit range, searching event"
                );
                self.lookup(&text).await
            }
            None => {
                info!(source = ?self.config.search_source, "No issues found in event");
                Ok(RunOutcome::NoKeys)
            }
        }
    }

    /// Returns the first key in `text` that exists in Jira.
    async fn lookup(&self, text: &str) -> Result<RunOutcome, RunnerError> {
        let candidates = extract_keys(text);
        if candidates.is_empty() {
            info!(text, "String does not contain issue keys");
            return Ok(RunOutcome::NoKeys);
        }

        for candidate in candidates {
            let key = IssueKey::new(candidate);
            if let Some(issue) = self
                .jira
                .get_issue(&key, &IssueQuery::default(), ApiVersion::V2)
                .await?
            {
                info!(key = %key, "Found issue");
                return Ok(RunOutcome::Single(IssueRecord::minimal(IssueKey::new(&issue.key))));
            }
            debug!(key = %key, "Candidate key not found in Jira");
        }

        Ok(RunOutcome::NoKeys)
    }

    /// Rewrites the pull request title and body, if the event has one.
    async fn update_pull_request(
        &self,
        records: &[IssueRecord],
        summary: &mut RunSummary,
    ) -> Result<Option<TitleOutcome>, RunnerError> {
        let Some(pr) = &self.config.event.pull_request else {
            debug!("No pull request in event, skipping pull request update");
            return Ok(None);
        };

        let mut title = pr.title.trim().to_string();
        let outcome = self.config.standardize_pr_title.then(|| {
            let keys: Vec<IssueKey> = records.iter().map(|record| record.key().clone()).collect();
            standardize_pr_title(&title, &keys)
        });
        if let Some(TitleOutcome::Standardized { title: new_title, .. }) = &outcome {
            info!(from = %title, to = %new_title, "Standardized pull request title");
            title = new_title.clone();
        }

        let block = self.renderer.pull_request_block(records)?;
        let body = merge_region(
            START_TOKEN,
            END_TOKEN,
            pr.body.as_deref().unwrap_or_default(),
            &block,
        );

        self.github
            .update_pull_request(pr.number, &PullRequestUpdate { title, body })
            .await?;
        summary.pull_request_updated = true;
        info!(number = pr.number, "Pull request updated");

        Ok(outcome)
    }
}
