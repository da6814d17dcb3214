//! Run results.

use crate::output::{ActionOutput, OutputError};
use crate::record::IssueRecord;
use crate::summary::RunSummary;
use crate::templates::TitleOutcome;
use crate::transitions::TransitionReport;

/// What a run produced.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Keys from the commit range resolved to Jira issues and were synced.
    Linked(RunReport),

    /// The ad-hoc lookup found an issue. Only the key is populated.
    Single(IssueRecord),

    /// No key resolved to an existing issue.
    NoKeys,
}

/// Details of a synced commit range.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Synced records, in discovery order.
    pub records: Vec<IssueRecord>,

    /// Transition report per record.
    pub transitions: Vec<TransitionReport>,

    /// Rendered release notes, as written to the `notes` output.
    pub release_notes: String,

    /// Title standardization result, when it was attempted.
    pub title: Option<TitleOutcome>,

    pub summary: RunSummary,
}

impl RunOutcome {
    /// Writes the step outputs for this outcome.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if an output cannot be written.
    pub fn write_outputs(&self, output: &ActionOutput) -> Result<(), OutputError> {
        match self {
            Self::Linked(report) => {
                let keys = report
                    .records
                    .iter()
                    .map(|record| record.key().as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                output.set("issues", &keys)?;
                output.set("notes", &report.release_notes)?;
                if let Some(TitleOutcome::Standardized { suffix, .. }) = &report.title {
                    output.set("title", suffix)?;
                }
                Ok(())
            }
            Self::Single(record) => output.set("issue", record.key().as_str()),
            Self::NoKeys => Ok(()),
        }
    }
}
