//! Jira REST payload types.
//!
//! Only the fields the sync reads are modelled; everything else in the
//! payload is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Jira REST API version used for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Version 2: wiki-markup descriptions.
    V2,
    /// Version 3: sprint metadata, document-format descriptions.
    V3,
}

impl ApiVersion {
    /// Path segment for this version.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2 => "2",
            Self::V3 => "3",
        }
    }
}

/// Field selection for an issue fetch. Empty lists mean "server default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueQuery {
    /// Fields to return.
    pub fields: Vec<String>,

    /// Entities to expand.
    pub expand: Vec<String>,
}

impl IssueQuery {
    /// Query returning only the named fields.
    #[must_use]
    pub fn fields(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            expand: Vec::new(),
        }
    }
}

/// An issue as returned by `GET /rest/api/{version}/issue/{key}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IssuePayload {
    /// Issue key, e.g. `API-123`.
    pub key: String,

    /// Issue fields.
    #[serde(default)]
    pub fields: IssueFields,
}

/// The subset of issue fields used by the normalizer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    pub summary: Option<String>,
    pub project: Option<Project>,
    pub priority: Option<NamedValue>,
    pub status: Option<Status>,
    pub fix_versions: Option<Vec<NamedValue>>,
    /// Wiki markup string in v2, document object in v3.
    pub description: Option<serde_json::Value>,
    pub sprint: Option<Sprint>,
    pub assignee: Option<User>,
}

/// Issue project.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

/// Any Jira entity identified by a display name (priority, fix version, ...).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamedValue {
    pub name: String,
}

/// Workflow status.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub name: String,
    pub status_category: Option<NamedValue>,
}

/// Active sprint attached to an issue.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub name: String,
    pub end_date: Option<String>,
}

/// Issue assignee.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: Option<String>,
}

/// A workflow transition available from the issue's current state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

/// Response of `GET /rest/api/2/issue/{key}/transitions`.
#[derive(Debug, Deserialize)]
pub(crate) struct TransitionsResponse {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// Body of `POST /rest/api/2/issue/{key}/transitions`.
#[derive(Debug, Serialize)]
pub(crate) struct TransitionRequest<'a> {
    pub transition: TransitionId<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransitionId<'a> {
    pub id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_v3_issue() {
        let payload: IssuePayload = serde_json::from_value(json!({
            "key": "API-1",
            "fields": {
                "summary": "Login fails",
                "project": { "key": "API", "name": "Public API" },
                "priority": { "name": "High" },
                "status": { "name": "Open", "statusCategory": { "name": "To Do" } },
                "fixVersions": [{ "name": "1.2.0" }],
                "description": { "type": "doc", "content": [] },
                "sprint": { "name": "Sprint 4", "endDate": "2024-05-01T00:00:00.000Z" },
                "customfield_10500": ["ignored"]
            }
        }))
        .unwrap();

        assert_eq!(payload.key, "API-1");
        let fields = payload.fields;
        assert_eq!(fields.project.unwrap().name, "Public API");
        assert_eq!(fields.status.unwrap().status_category.unwrap().name, "To Do");
        assert_eq!(fields.fix_versions.unwrap()[0].name, "1.2.0");
        assert!(fields.description.unwrap().is_object());
        assert_eq!(
            fields.sprint.unwrap().end_date.as_deref(),
            Some("2024-05-01T00:00:00.000Z")
        );
    }

    #[test]
    fn tolerates_missing_and_null_fields() {
        let payload: IssuePayload = serde_json::from_value(json!({
            "key": "API-2",
            "fields": { "fixVersions": null, "description": null }
        }))
        .unwrap();

        assert!(payload.fields.fix_versions.is_none());
        assert!(payload.fields.description.is_none());
        assert!(payload.fields.summary.is_none());
    }

    #[test]
    fn serializes_transition_request() {
        let body = TransitionRequest {
            transition: TransitionId { id: "31" },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "transition": { "id": "31" } })
        );
    }
}
