//! The GitHub Actions event payload.
//!
//! Only the fields the sync reads are modelled; everything else in the
//! payload is ignored.

use super::GithubError;
use serde::Deserialize;
use std::path::Path;

/// Subset of the webhook payload found at `GITHUB_EVENT_PATH`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubEvent {
    pub action: Option<String>,

    /// Pushed or created ref, e.g. `refs/heads/main` or `feature/API-1`.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,

    /// `branch` or `tag` for `create` events.
    pub ref_type: Option<String>,

    /// Commits of a `push` event.
    #[serde(default)]
    pub commits: Vec<PushCommit>,

    pub pull_request: Option<PullRequest>,

    pub review: Option<Review>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushCommit {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    pub merged: Option<bool>,
    pub head: Option<BranchRef>,
    pub base: Option<BranchRef>,
}

/// A branch tip referenced by a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub state: String,
}

impl GithubEvent {
    /// Reads and parses the payload at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::EventRead`] or [`GithubError::EventParse`].
    pub fn load(path: &Path) -> Result<Self, GithubError> {
        let content = std::fs::read_to_string(path).map_err(|source| GithubError::EventRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| GithubError::EventParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Text to search for keys when nothing was found in the commit range.
    ///
    /// Returns `None` when the selected source is missing or blank.
    #[must_use]
    pub fn search_text(&self, source: SearchSource) -> Option<String> {
        let text = match source {
            SearchSource::Commits => self
                .commits
                .iter()
                .map(|commit| commit.message.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            SearchSource::Branch => self.git_ref.clone()?,
            SearchSource::PullRequest => self.pull_request.as_ref()?.title.clone(),
        };
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Where the fallback search string comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchSource {
    /// Messages of the pushed commits, joined by a space.
    #[default]
    Commits,
    /// The event ref.
    Branch,
    /// The pull request title.
    PullRequest,
}

/// Head and base of the commit range to scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Refs {
    pub head: Option<String>,
    pub base: Option<String>,
}

impl Refs {
    /// Derives refs from the payload: pull requests give both ends, other
    /// events only give a head.
    #[must_use]
    pub fn from_event(event: &GithubEvent) -> Self {
        match &event.pull_request {
            Some(pr) => Self {
                head: pr.head.as_ref().map(|head| head.name.clone()),
                base: pr.base.as_ref().map(|base| base.name.clone()),
            },
            None => Self {
                head: event.git_ref.clone(),
                base: None,
            },
        }
    }

    /// True for tag pushes that still lack a base; the previous release is
    /// used as the base in that case.
    #[must_use]
    pub fn needs_release_base(&self, event_name: &str) -> bool {
        event_name == "push"
            && self.base.is_none()
            && self
                .head
                .as_deref()
                .is_some_and(|head| head.starts_with("refs/tags/"))
    }

    /// Applies explicit overrides, which always win.
    #[must_use]
    pub fn with_overrides(self, overrides: &Refs) -> Self {
        Self {
            head: non_empty(overrides.head.as_deref()).or(self.head),
            base: non_empty(overrides.base.as_deref()).or(self.base),
        }
    }

    /// The `(base, head)` pair when both ends are known.
    #[must_use]
    pub fn range(&self) -> Option<(&str, &str)> {
        Some((non_empty_ref(&self.base)?, non_empty_ref(&self.head)?))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

fn non_empty_ref(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn event(value: serde_json::Value) -> GithubEvent {
        serde_json::from_value(value).unwrap()
    }

    fn pr_event() -> GithubEvent {
        event(json!({
            "action": "opened",
            "pull_request": {
                "number": 7,
                "title": "[API-123] fix the thing",
                "body": null,
                "head": { "ref": "feature/API-124" },
                "base": { "ref": "main" }
            }
        }))
    }

    #[test]
    fn loads_payload_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"ref": "refs/heads/main", "commits": [{{"message": "API-1 fix"}}]}}"#
        )
        .unwrap();

        let event = GithubEvent::load(file.path()).unwrap();
        assert_eq!(event.git_ref.as_deref(), Some("refs/heads/main"));
        assert_eq!(event.commits.len(), 1);
    }

    #[test]
    fn reports_unreadable_and_invalid_payloads() {
        let missing = GithubEvent::load(Path::new("/nonexistent/event.json"));
        assert!(matches!(missing, Err(GithubError::EventRead { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let invalid = GithubEvent::load(file.path());
        assert!(matches!(invalid, Err(GithubError::EventParse { .. })));
    }

    #[test]
    fn search_text_per_source() {
        let push = event(json!({
            "ref": "refs/heads/API-9-work",
            "commits": [{ "message": "API-1 first" }, { "message": "second" }]
        }));
        assert_eq!(
            push.search_text(SearchSource::Commits).as_deref(),
            Some("API-1 first second")
        );
        assert_eq!(
            push.search_text(SearchSource::Branch).as_deref(),
            Some("refs/heads/API-9-work")
        );
        assert_eq!(push.search_text(SearchSource::PullRequest), None);

        assert_eq!(
            pr_event().search_text(SearchSource::PullRequest).as_deref(),
            Some("[API-123] fix the thing")
        );
        assert_eq!(pr_event().search_text(SearchSource::Commits), None);
    }

    #[test]
    fn refs_from_pull_request() {
        let refs = Refs::from_event(&pr_event());
        assert_eq!(refs.range(), Some(("main", "feature/API-124")));
        assert!(!refs.needs_release_base("pull_request"));
    }

    #[test]
    fn tag_push_needs_release_base() {
        let refs = Refs::from_event(&event(json!({ "ref": "refs/tags/v1.2.0" })));
        assert_eq!(refs.head.as_deref(), Some("refs/tags/v1.2.0"));
        assert_eq!(refs.range(), None);
        assert!(refs.needs_release_base("push"));
        assert!(!refs.needs_release_base("create"));

        let branch = Refs::from_event(&event(json!({ "ref": "refs/heads/main" })));
        assert!(!branch.needs_release_base("push"));
    }

    #[test]
    fn overrides_win() {
        let refs = Refs::from_event(&pr_event()).with_overrides(&Refs {
            head: Some("hotfix".to_string()),
            base: Some(String::new()),
        });
        assert_eq!(refs.range(), Some(("main", "hotfix")));
    }
}
