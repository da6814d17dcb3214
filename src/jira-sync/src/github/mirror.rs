//! Mirrors Jira records into GitHub milestones and issues.

use super::{GithubApi, GithubError, IssueRequest, MilestoneRequest};
use crate::keys::{extract_keys, IssueKey};
use crate::record::{IssueRecord, RecordError};
use thiserror::Error;
use tracing::{debug, info, info_span, Instrument};

/// Errors raised while mirroring a record.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error(transparent)]
    Github(#[from] GithubError),

    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Creates or updates the GitHub counterpart of each Jira record.
pub struct GithubMirror<'a> {
    github: &'a dyn GithubApi,
}

impl<'a> GithubMirror<'a> {
    #[must_use]
    pub fn new(github: &'a dyn GithubApi) -> Self {
        Self { github }
    }

    /// Ensures an open milestone titled `title` exists and returns its number.
    ///
    /// Titles match exactly, case included. An existing milestone gets its
    /// description and due date refreshed and is reopened.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Github`] if a GitHub call fails.
    pub async fn create_or_update_milestone(
        &self,
        title: &str,
        due_on: Option<&str>,
        description: &str,
    ) -> Result<u64, MirrorError> {
        let request = MilestoneRequest {
            title: title.to_string(),
            state: "open".to_string(),
            description: description.to_string(),
            due_on: due_on.map(str::to_string),
        };

        let existing = self
            .github
            .list_milestones()
            .await?
            .into_iter()
            .find(|milestone| milestone.title == title);

        let milestone = match existing {
            Some(milestone) => {
                let updated = self.github.update_milestone(milestone.number, &request).await?;
                info!(milestone = %title, number = updated.number, "Milestone updated");
                updated
            }
            None => {
                let created = self.github.create_milestone(&request).await?;
                info!(milestone = %title, number = created.number, "Milestone created");
                created
            }
        };
        Ok(milestone.number)
    }

    /// Creates or updates the issue mirroring `record` and returns its number.
    ///
    /// An open issue whose title mentions the record's key is reused.
    /// Assignees are always cleared; Jira users have no GitHub identity here.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Github`] if a GitHub call fails.
    pub async fn create_or_update_issue(
        &self,
        record: &IssueRecord,
        milestone: Option<u64>,
    ) -> Result<u64, MirrorError> {
        let request = IssueRequest {
            title: format!("{}: {}", record.key(), record.summary),
            body: record.description.clone(),
            assignees: Vec::new(),
            milestone,
        };
        if let Some(assignee) = &record.assignee {
            debug!(assignee = %assignee, "Jira assignee not mapped to GitHub");
        }

        let existing = self
            .github
            .list_open_issues()
            .await?
            .into_iter()
            .find(|issue| !issue.is_pull_request() && mentions_key(&issue.title, record.key()));

        let issue = match existing {
            Some(issue) => {
                debug!(number = issue.number, "Updating existing GitHub issue");
                self.github.update_issue(issue.number, &request).await?
            }
            None => {
                debug!("Creating GitHub issue");
                self.github.create_issue(&request).await?
            }
        };
        info!(number = issue.number, "GitHub issue synced");
        Ok(issue.number)
    }

    /// Mirrors `record` and links the resulting issue number to it.
    ///
    /// A milestone is only managed when `fix_version` is set.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError`] if GitHub fails or the record is already linked.
    pub async fn mirror_record(
        &self,
        record: &mut IssueRecord,
        fix_version: Option<&str>,
    ) -> Result<u64, MirrorError> {
        let span = info_span!("mirror", key = %record.key());

        async {
            let milestone = match fix_version.filter(|version| !version.is_empty()) {
                Some(version) => {
                    let description =
                        format!("Jira project {} Fix Version {version}", record.project_key);
                    Some(
                        self.create_or_update_milestone(
                            version,
                            record.duedate.as_deref(),
                            &description,
                        )
                        .await?,
                    )
                }
                None => None,
            };

            let number = self.create_or_update_issue(record, milestone).await?;
            record.link_github_issue(number)?;
            Ok(number)
        }
        .instrument(span)
        .await
    }
}

/// True when `title` contains `key` as a whole key, not as a prefix of a longer one.
fn mentions_key(title: &str, key: &IssueKey) -> bool {
    extract_keys(title)
        .into_iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{Issue, Milestone, PullRequestUpdate};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeGithub {
        milestones: Vec<Milestone>,
        issues: Vec<Issue>,
        calls: Mutex<Vec<String>>,
        issue_requests: Mutex<Vec<IssueRequest>>,
    }

    impl FakeGithub {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record_call(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl GithubApi for FakeGithub {
        async fn list_milestones(&self) -> Result<Vec<Milestone>, GithubError> {
            Ok(self.milestones.clone())
        }

        async fn create_milestone(
            &self,
            milestone: &MilestoneRequest,
        ) -> Result<Milestone, GithubError> {
            self.record_call(format!("create_milestone {}", milestone.title));
            Ok(Milestone {
                number: 50,
                title: milestone.title.clone(),
            })
        }

        async fn update_milestone(
            &self,
            number: u64,
            milestone: &MilestoneRequest,
        ) -> Result<Milestone, GithubError> {
            self.record_call(format!("update_milestone {number}"));
            Ok(Milestone {
                number,
                title: milestone.title.clone(),
            })
        }

        async fn list_open_issues(&self) -> Result<Vec<Issue>, GithubError> {
            Ok(self.issues.clone())
        }

        async fn create_issue(&self, issue: &IssueRequest) -> Result<Issue, GithubError> {
            self.record_call("create_issue".to_string());
            self.issue_requests.lock().unwrap().push(issue.clone());
            Ok(Issue {
                number: 99,
                title: issue.title.clone(),
                pull_request: None,
            })
        }

        async fn update_issue(
            &self,
            number: u64,
            issue: &IssueRequest,
        ) -> Result<Issue, GithubError> {
            self.record_call(format!("update_issue {number}"));
            self.issue_requests.lock().unwrap().push(issue.clone());
            Ok(Issue {
                number,
                title: issue.title.clone(),
                pull_request: None,
            })
        }

        async fn update_pull_request(
            &self,
            _: u64,
            _: &PullRequestUpdate,
        ) -> Result<(), GithubError> {
            unreachable!("mirror never updates pull requests")
        }

        async fn compare_commits(&self, _: &str, _: &str) -> Result<Vec<String>, GithubError> {
            unreachable!("mirror never compares commits")
        }

        async fn latest_release_tag(&self) -> Result<Option<String>, GithubError> {
            unreachable!("mirror never reads releases")
        }
    }

    fn record() -> IssueRecord {
        let mut record = IssueRecord::minimal(IssueKey::new("API-1"));
        record.summary = "Token refresh races".to_string();
        record.project_key = "API".to_string();
        record.description = Some("## Steps".to_string());
        record.duedate = Some("2024-02-01".to_string());
        record
    }

    fn issue(number: u64, title: &str, is_pr: bool) -> Issue {
        Issue {
            number,
            title: title.to_string(),
            pull_request: is_pr.then(|| serde_json::json!({})),
        }
    }

    #[tokio::test]
    async fn creates_milestone_and_issue() {
        let github = FakeGithub::default();
        let mut record = record();

        let number = GithubMirror::new(&github)
            .mirror_record(&mut record, Some("1.0"))
            .await
            .unwrap();

        assert_eq!(number, 99);
        assert_eq!(record.gh_number(), Some(99));
        assert_eq!(github.calls(), vec!["create_milestone 1.0", "create_issue"]);

        let requests = github.issue_requests.lock().unwrap();
        assert_eq!(requests[0].title, "API-1: Token refresh races");
        assert_eq!(requests[0].body.as_deref(), Some("## Steps"));
        assert_eq!(requests[0].milestone, Some(50));
        assert!(requests[0].assignees.is_empty());
    }

    #[tokio::test]
    async fn reuses_existing_milestone_and_issue() {
        let github = FakeGithub {
            milestones: vec![
                Milestone {
                    number: 3,
                    title: "1.0-beta".to_string(),
                },
                Milestone {
                    number: 4,
                    title: "1.0".to_string(),
                },
            ],
            issues: vec![
                issue(10, "API-1: old title", true),
                issue(11, "API-12: other", false),
                issue(12, "API-1: old title", false),
            ],
            ..Default::default()
        };
        let mut record = record();

        let number = GithubMirror::new(&github)
            .mirror_record(&mut record, Some("1.0"))
            .await
            .unwrap();

        assert_eq!(number, 12);
        assert_eq!(github.calls(), vec!["update_milestone 4", "update_issue 12"]);
    }

    #[tokio::test]
    async fn milestone_match_is_case_sensitive() {
        let github = FakeGithub {
            milestones: vec![Milestone {
                number: 4,
                title: "Release".to_string(),
            }],
            ..Default::default()
        };

        let number = GithubMirror::new(&github)
            .create_or_update_milestone("release", None, "desc")
            .await
            .unwrap();

        assert_eq!(number, 50);
        assert_eq!(github.calls(), vec!["create_milestone release"]);
    }

    #[tokio::test]
    async fn skips_milestone_without_fix_version() {
        let github = FakeGithub::default();
        let mut record = record();

        GithubMirror::new(&github)
            .mirror_record(&mut record, None)
            .await
            .unwrap();

        assert_eq!(github.calls(), vec!["create_issue"]);
        assert_eq!(github.issue_requests.lock().unwrap()[0].milestone, None);
    }

    #[tokio::test]
    async fn refuses_to_relink_record() {
        let github = FakeGithub::default();
        let mut record = record();
        record.link_github_issue(5).unwrap();

        let result = GithubMirror::new(&github).mirror_record(&mut record, None).await;

        assert!(matches!(result, Err(MirrorError::Record(_))));
        assert_eq!(record.gh_number(), Some(5));
    }

    #[test]
    fn key_mentions_are_whole_keys() {
        let key = IssueKey::new("API-1");
        assert!(mentions_key("API-1: fix", &key));
        assert!(mentions_key("[api-1] fix", &key));
        assert!(!mentions_key("API-12: other", &key));
        assert!(!mentions_key("XAPI-1 thing", &key));
    }
}
