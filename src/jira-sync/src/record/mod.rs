//! Internal issue records.
//!
//! An [`IssueRecord`] is built once from the Jira payloads by [`normalize`],
//! then enriched as the run proceeds: the transition engine overwrites its
//! status and the GitHub mirror links an issue number.

mod error;
pub mod markdown;
mod normalize;

pub use error::RecordError;
pub use markdown::jira_to_markdown;
pub use normalize::normalize;

use crate::keys::IssueKey;
use serde::Serialize;

/// A Jira issue flattened into the fields the sync works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    key: IssueKey,

    /// Project display name.
    pub project_name: String,

    /// Project key, e.g. `API`.
    pub project_key: String,

    /// Priority name.
    pub priority: String,

    /// Workflow status name.
    pub status: String,

    /// Status category name (`To Do`, `In Progress`, `Done`).
    pub status_category: String,

    /// Issue summary line.
    pub summary: String,

    /// Description converted to markdown.
    pub description: Option<String>,

    /// Description in Jira wiki markup, as fetched.
    pub description_jira: Option<String>,

    /// Fix versions, in Jira order, with the configured target appended.
    pub fix_versions: Vec<String>,

    /// Active sprint name.
    pub sprint: Option<String>,

    /// Active sprint end date.
    pub duedate: Option<String>,

    /// Assignee display name.
    pub assignee: Option<String>,

    gh_number: Option<u64>,
}

impl IssueRecord {
    /// Creates a record holding only its key.
    #[must_use]
    pub fn minimal(key: IssueKey) -> Self {
        Self {
            key,
            project_name: String::new(),
            project_key: String::new(),
            priority: String::new(),
            status: String::new(),
            status_category: String::new(),
            summary: String::new(),
            description: None,
            description_jira: None,
            fix_versions: Vec::new(),
            sprint: None,
            duedate: None,
            assignee: None,
            gh_number: None,
        }
    }

    /// The issue key.
    #[must_use]
    pub fn key(&self) -> &IssueKey {
        &self.key
    }

    /// The linked GitHub issue number, if mirrored.
    #[must_use]
    pub fn gh_number(&self) -> Option<u64> {
        self.gh_number
    }

    /// Links the mirrored GitHub issue. A record can be linked only once.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::AlreadyLinked`] if a number is already set.
    pub fn link_github_issue(&mut self, number: u64) -> Result<(), RecordError> {
        if let Some(existing) = self.gh_number {
            return Err(RecordError::AlreadyLinked {
                key: self.key.to_string(),
                existing,
            });
        }
        self.gh_number = Some(number);
        Ok(())
    }
}
