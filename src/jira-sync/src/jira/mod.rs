//! Jira REST access.
//!
//! The sync only needs three operations: fetching an issue, listing the
//! transitions available from its current state, and applying one. They are
//! exposed through [`JiraApi`] so the engine can run against any backend.

mod client;
mod error;
mod types;

pub use client::JiraClient;
pub use error::JiraError;
pub use types::{
    ApiVersion, IssueFields, IssuePayload, IssueQuery, NamedValue, Project, Sprint, Status,
    Transition, User,
};

use crate::keys::IssueKey;
use async_trait::async_trait;

/// Operations the sync performs against Jira.
#[async_trait]
pub trait JiraApi: Send + Sync {
    /// Fetches an issue, returning `None` when Jira reports it as missing.
    async fn get_issue(
        &self,
        key: &IssueKey,
        query: &IssueQuery,
        version: ApiVersion,
    ) -> Result<Option<IssuePayload>, JiraError>;

    /// Lists the transitions available from the issue's current state.
    async fn get_issue_transitions(&self, key: &IssueKey) -> Result<Vec<Transition>, JiraError>;

    /// Applies a transition by id.
    async fn transition_issue(&self, key: &IssueKey, transition_id: &str) -> Result<(), JiraError>;
}
