//! GitHub side of the sync.
//!
//! [`GithubApi`] is the seam the runner and mirror depend on;
//! [`OctocrabGithub`] implements it for a single repository.

mod client;
mod error;
mod event;
pub mod mirror;
mod rate_limit;

pub use client::OctocrabGithub;
pub use error::GithubError;
pub use event::{BranchRef, GithubEvent, PullRequest, PushCommit, Refs, Review, SearchSource};
pub use mirror::{GithubMirror, MirrorError};
pub use rate_limit::{core_quota, ensure_core_quota, CoreQuota};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A repository milestone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
}

/// A repository issue, as listed or returned after a write.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    /// Present when the "issue" is actually a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    /// Returns true for pull requests listed through the issues endpoint.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Body of a milestone create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneRequest {
    pub title: String,
    pub state: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

/// Body of an issue create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRequest {
    pub title: String,
    pub body: Option<String>,
    pub assignees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

/// Body of a pull request update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestUpdate {
    pub title: String,
    pub body: String,
}

/// GitHub operations used by the sync, scoped to one repository.
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Lists milestones in every state.
    async fn list_milestones(&self) -> Result<Vec<Milestone>, GithubError>;

    async fn create_milestone(
        &self,
        milestone: &MilestoneRequest,
    ) -> Result<Milestone, GithubError>;

    async fn update_milestone(
        &self,
        number: u64,
        milestone: &MilestoneRequest,
    ) -> Result<Milestone, GithubError>;

    /// Lists open issues, newest first. May include pull requests.
    async fn list_open_issues(&self) -> Result<Vec<Issue>, GithubError>;

    async fn create_issue(&self, issue: &IssueRequest) -> Result<Issue, GithubError>;

    async fn update_issue(&self, number: u64, issue: &IssueRequest) -> Result<Issue, GithubError>;

    async fn update_pull_request(
        &self,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<(), GithubError>;

    /// Commit messages between `base` and `head`, oldest first.
    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<String>, GithubError>;

    /// Tag of the latest published release, if any.
    async fn latest_release_tag(&self) -> Result<Option<String>, GithubError>;
}
