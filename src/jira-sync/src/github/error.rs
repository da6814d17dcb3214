//! GitHub error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to GitHub or reading the event payload.
#[derive(Debug, Error)]
pub enum GithubError {
    /// A GitHub REST call failed.
    #[error("GitHub API error during {operation}: {source}")]
    Api {
        operation: &'static str,
        #[source]
        source: octocrab::Error,
    },

    /// The octocrab client could not be built.
    #[error("Failed to build GitHub client: {0}")]
    Client(#[source] octocrab::Error),

    /// The repository is not in `owner/name` form.
    #[error("Invalid repository '{0}', expected 'owner/name'")]
    InvalidRepository(String),

    /// The event payload file could not be read.
    #[error("Failed to read event payload {}: {source}", path.display())]
    EventRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The event payload is not valid JSON for a GitHub event.
    #[error("Failed to parse event payload {}: {source}", path.display())]
    EventParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl GithubError {
    /// Wraps an octocrab error raised by `operation`.
    pub(crate) fn api(operation: &'static str) -> impl FnOnce(octocrab::Error) -> Self {
        move |source| Self::Api { operation, source }
    }

    /// Returns true if GitHub answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Api {
                source: octocrab::Error::GitHub { source, .. },
                ..
            } if source.status_code.as_u16() == 404
        )
    }
}
