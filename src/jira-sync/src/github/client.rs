//! [`GithubApi`] over octocrab.

use super::rate_limit::ensure_core_quota;
use super::{
    GithubApi, GithubError, Issue, IssueRequest, Milestone, MilestoneRequest, PullRequestUpdate,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::debug;

/// GitHub client bound to one repository.
#[derive(Clone)]
pub struct OctocrabGithub {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

#[derive(Deserialize)]
struct Comparison {
    #[serde(default)]
    commits: Vec<ComparedCommit>,
}

#[derive(Deserialize)]
struct ComparedCommit {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

impl OctocrabGithub {
    /// Builds an authenticated client for `repository` (`owner/name`).
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::InvalidRepository`] for a malformed repository
    /// or [`GithubError::Client`] if octocrab cannot be built.
    pub fn new(token: &str, repository: &str) -> Result<Self, GithubError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(GithubError::Client)?;
        Self::with_client(octocrab, repository)
    }

    /// Wraps an existing octocrab client.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::InvalidRepository`] for a malformed repository.
    pub fn with_client(octocrab: Octocrab, repository: &str) -> Result<Self, GithubError> {
        let (owner, repo) = parse_repository(repository)?;
        Ok(Self {
            octocrab,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    fn route(&self, path: &str) -> String {
        format!("/repos/{}/{}/{path}", self.owner, self.repo)
    }

    async fn ensure_quota(&self, operation: &'static str) -> Result<(), GithubError> {
        ensure_core_quota(&self.octocrab)
            .await
            .map_err(GithubError::api(operation))
    }
}

fn parse_repository(repository: &str) -> Result<(&str, &str), GithubError> {
    match repository.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(GithubError::InvalidRepository(repository.to_string())),
    }
}

#[async_trait]
impl GithubApi for OctocrabGithub {
    async fn list_milestones(&self) -> Result<Vec<Milestone>, GithubError> {
        self.octocrab
            .get(
                self.route("milestones"),
                Some(&[("state", "all"), ("per_page", "100")]),
            )
            .await
            .map_err(GithubError::api("listMilestones"))
    }

    async fn create_milestone(
        &self,
        milestone: &MilestoneRequest,
    ) -> Result<Milestone, GithubError> {
        self.ensure_quota("createMilestone").await?;
        self.octocrab
            .post(self.route("milestones"), Some(milestone))
            .await
            .map_err(GithubError::api("createMilestone"))
    }

    async fn update_milestone(
        &self,
        number: u64,
        milestone: &MilestoneRequest,
    ) -> Result<Milestone, GithubError> {
        self.ensure_quota("updateMilestone").await?;
        self.octocrab
            .patch(self.route(&format!("milestones/{number}")), Some(milestone))
            .await
            .map_err(GithubError::api("updateMilestone"))
    }

    async fn list_open_issues(&self) -> Result<Vec<Issue>, GithubError> {
        self.octocrab
            .get(
                self.route("issues"),
                Some(&[
                    ("state", "open"),
                    ("sort", "created"),
                    ("per_page", "100"),
                ]),
            )
            .await
            .map_err(GithubError::api("listIssues"))
    }

    async fn create_issue(&self, issue: &IssueRequest) -> Result<Issue, GithubError> {
        self.ensure_quota("createIssue").await?;
        self.octocrab
            .post(self.route("issues"), Some(issue))
            .await
            .map_err(GithubError::api("createIssue"))
    }

    async fn update_issue(&self, number: u64, issue: &IssueRequest) -> Result<Issue, GithubError> {
        self.ensure_quota("updateIssue").await?;
        self.octocrab
            .patch(self.route(&format!("issues/{number}")), Some(issue))
            .await
            .map_err(GithubError::api("updateIssue"))
    }

    async fn update_pull_request(
        &self,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<(), GithubError> {
        self.ensure_quota("updatePullRequest").await?;
        let _: serde_json::Value = self
            .octocrab
            .patch(self.route(&format!("pulls/{number}")), Some(update))
            .await
            .map_err(GithubError::api("updatePullRequest"))?;
        Ok(())
    }

    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<String>, GithubError> {
        debug!(base, head, "Comparing commits");
        let comparison: Comparison = self
            .octocrab
            .get(self.route(&format!("compare/{base}...{head}")), None::<&()>)
            .await
            .map_err(GithubError::api("compareCommits"))?;

        Ok(comparison
            .commits
            .into_iter()
            .map(|commit| commit.commit.message)
            .collect())
    }

    async fn latest_release_tag(&self) -> Result<Option<String>, GithubError> {
        let result: Result<Release, GithubError> = self
            .octocrab
            .get(self.route("releases/latest"), None::<&()>)
            .await
            .map_err(GithubError::api("getLatestRelease"));

        match result {
            Ok(release) => Ok(Some(release.tag_name)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
