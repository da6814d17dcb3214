//! Reconciles the v3 and v2 issue payloads into one record.

use super::markdown::jira_to_markdown;
use super::IssueRecord;
use crate::jira::{IssuePayload, Sprint};
use crate::keys::IssueKey;
use tracing::debug;

/// Builds an [`IssueRecord`] from the two API versions of the same issue.
///
/// The v3 payload is authoritative for every field except the description,
/// which only the v2 payload carries in a convertible form (wiki markup).
/// Sprint data comes from v3 when present and falls back to v2.
///
/// `target_fix_version` is appended to the fix versions when missing; Jira is
/// not updated.
#[must_use]
pub fn normalize(
    v3: &IssuePayload,
    v2: Option<&IssuePayload>,
    target_fix_version: Option<&str>,
) -> IssueRecord {
    let fields = &v3.fields;
    let mut record = IssueRecord::minimal(IssueKey::new(&v3.key));

    if let Some(project) = &fields.project {
        record.project_name = project.name.clone();
        record.project_key = project.key.clone();
    }
    if let Some(priority) = &fields.priority {
        record.priority = priority.name.clone();
    }
    if let Some(status) = &fields.status {
        record.status = status.name.clone();
        if let Some(category) = &status.status_category {
            record.status_category = category.name.clone();
        }
    }
    record.summary = fields.summary.clone().unwrap_or_default();
    record.assignee = fields
        .assignee
        .as_ref()
        .and_then(|user| user.display_name.clone());

    record.fix_versions = merge_fix_versions(
        fields
            .fix_versions
            .iter()
            .flatten()
            .map(|version| version.name.as_str()),
        target_fix_version,
    );

    if let Some(markup) = v2
        .and_then(|issue| issue.fields.description.as_ref())
        .and_then(|description| description.as_str())
    {
        record.description = Some(jira_to_markdown(markup));
        record.description_jira = Some(markup.to_string());
    }

    if let Some(sprint) = active_sprint(v3, v2) {
        record.sprint = Some(sprint.name.clone());
        record.duedate = sprint.end_date.clone();
    }

    debug!(
        key = %record.key(),
        status = %record.status,
        fix_versions = ?record.fix_versions,
        sprint = ?record.sprint,
        "Normalized Jira issue"
    );

    record
}

fn merge_fix_versions<'a>(
    existing: impl Iterator<Item = &'a str>,
    target: Option<&'a str>,
) -> Vec<String> {
    let mut versions: Vec<String> = Vec::new();
    for name in existing.chain(target) {
        if !name.is_empty() && !versions.iter().any(|v| v == name) {
            versions.push(name.to_string());
        }
    }
    versions
}

fn active_sprint<'a>(v3: &'a IssuePayload, v2: Option<&'a IssuePayload>) -> Option<&'a Sprint> {
    v3.fields
        .sprint
        .as_ref()
        .or_else(|| v2.and_then(|issue| issue.fields.sprint.as_ref()))
}
