//! Text produced for GitHub: release notes and pull request titles.
//!
//! Release notes are rendered with Handlebars without HTML escaping, since
//! the output is markdown.

mod error;
mod notes;
mod title;

pub use error::TemplateError;
pub use notes::{ReleaseNotesRenderer, DEFAULT_ISSUE_LINE};
pub use title::{standardize_pr_title, TitleOutcome, MAX_TITLE_CHARS};
