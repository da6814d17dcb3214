//! Release notes rendering.

use super::TemplateError;
use crate::record::IssueRecord;
use handlebars::{no_escape, Handlebars};
use serde::Serialize;

/// Line rendered for each issue unless the settings file overrides it.
pub const DEFAULT_ISSUE_LINE: &str = "*  **[{{key}}]({{url}})** [{{#if status}}{{status}}{{else}}Jira Status Unknown{{/if}}] {{summary}} (Fix: #{{gh_number}})";

const ISSUE_LINE: &str = "issue-line";

/// Values available to the line template.
#[derive(Serialize)]
struct IssueLine<'a> {
    key: &'a str,
    url: String,
    jira_url: &'a str,
    project_key: &'a str,
    priority: &'a str,
    status: &'a str,
    summary: &'a str,
    gh_number: String,
}

/// Renders issue lists for the PR body and the `notes` output.
pub struct ReleaseNotesRenderer {
    handlebars: Handlebars<'static>,
    jira_url: String,
}

impl ReleaseNotesRenderer {
    /// Creates a renderer linking issues under `jira_url`.
    ///
    /// `line_template` replaces [`DEFAULT_ISSUE_LINE`] when given.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::RegistrationError`] if the template does not parse.
    pub fn new(jira_url: &str, line_template: Option<&str>) -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(no_escape);
        handlebars.set_strict_mode(true);
        handlebars
            .register_template_string(ISSUE_LINE, line_template.unwrap_or(DEFAULT_ISSUE_LINE))?;

        Ok(Self {
            handlebars,
            jira_url: jira_url.trim_end_matches('/').to_string(),
        })
    }

    /// One rendered line per record, newline separated.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::RenderError`] if a line fails to render.
    pub fn issue_list(&self, records: &[IssueRecord]) -> Result<String, TemplateError> {
        let lines = records
            .iter()
            .map(|record| self.render_line(record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    /// The `notes` output: a heading followed by the issue list.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::RenderError`] if a line fails to render.
    pub fn release_notes(&self, records: &[IssueRecord]) -> Result<String, TemplateError> {
        Ok(format!("### Release Notes:\n\n{}", self.issue_list(records)?))
    }

    /// The block merged into the pull request body.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::RenderError`] if a line fails to render.
    pub fn pull_request_block(&self, records: &[IssueRecord]) -> Result<String, TemplateError> {
        Ok(format!("### Linked Jira Issues:\n\n{}\n", self.issue_list(records)?))
    }

    fn render_line(&self, record: &IssueRecord) -> Result<String, TemplateError> {
        let key = record.key().as_str();
        let line = IssueLine {
            key,
            url: format!("{}/browse/{key}", self.jira_url),
            jira_url: &self.jira_url,
            project_key: &record.project_key,
            priority: &record.priority,
            status: &record.status,
            summary: &record.summary,
            gh_number: record
                .gh_number()
                .map(|number| number.to_string())
                .unwrap_or_default(),
        };
        Ok(self.handlebars.render(ISSUE_LINE, &line)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::IssueKey;

    fn record(key: &str, status: &str, summary: &str, gh_number: u64) -> IssueRecord {
        let mut record = IssueRecord::minimal(IssueKey::new(key));
        record.status = status.to_string();
        record.summary = summary.to_string();
        record.link_github_issue(gh_number).unwrap();
        record
    }

    #[test]
    fn renders_default_lines() {
        let renderer = ReleaseNotesRenderer::new("https://acme.atlassian.net/", None).unwrap();
        let records = [
            record("API-1", "Done", "Fix <login>", 12),
            record("API-2", "", "Add logout", 13),
        ];

        assert_eq!(
            renderer.issue_list(&records).unwrap(),
            "*  **[API-1](https://acme.atlassian.net/browse/API-1)** [Done] Fix <login> (Fix: #12)\n\
             *  **[API-2](https://acme.atlassian.net/browse/API-2)** [Jira Status Unknown] Add logout (Fix: #13)"
        );
    }

    #[test]
    fn wraps_lists_for_outputs() {
        let renderer = ReleaseNotesRenderer::new("https://acme.atlassian.net", None).unwrap();
        let records = [record("API-1", "Done", "Fix login", 12)];
        let line = "*  **[API-1](https://acme.atlassian.net/browse/API-1)** [Done] Fix login (Fix: #12)";

        assert_eq!(
            renderer.release_notes(&records).unwrap(),
            format!("### Release Notes:\n\n{line}")
        );
        assert_eq!(
            renderer.pull_request_block(&records).unwrap(),
            format!("### Linked Jira Issues:\n\n{line}\n")
        );
    }

    #[test]
    fn empty_record_list_renders_heading_only() {
        let renderer = ReleaseNotesRenderer::new("https://acme.atlassian.net", None).unwrap();
        assert_eq!(renderer.release_notes(&[]).unwrap(), "### Release Notes:\n\n");
    }

    #[test]
    fn custom_line_template() {
        let renderer =
            ReleaseNotesRenderer::new("https://acme.atlassian.net", Some("- {{key}} ({{status}})"))
                .unwrap();
        let records = [record("API-1", "Done", "Fix login", 12)];
        assert_eq!(renderer.issue_list(&records).unwrap(), "- API-1 (Done)");
    }

    #[test]
    fn rejects_invalid_template() {
        let result = ReleaseNotesRenderer::new("https://acme.atlassian.net", Some("{{#if key}}"));
        assert!(matches!(result, Err(TemplateError::RegistrationError(_))));
    }

    #[test]
    fn unknown_variable_fails_to_render() {
        let renderer =
            ReleaseNotesRenderer::new("https://acme.atlassian.net", Some("{{assignee}}")).unwrap();
        let records = [record("API-1", "Done", "Fix login", 12)];
        assert!(matches!(
            renderer.issue_list(&records),
            Err(TemplateError::RenderError(_))
        ));
    }
}
