//! Runner error types.

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings loading or validation errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Jira failures while resolving keys.
    #[error(transparent)]
    Jira(#[from] crate::jira::JiraError),

    /// GitHub failures outside of mirroring.
    #[error(transparent)]
    Github(#[from] crate::github::GithubError),

    /// Failures while mirroring a record into GitHub.
    #[error(transparent)]
    Mirror(#[from] crate::github::MirrorError),

    /// Release notes rendering errors.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// Step output errors.
    #[error(transparent)]
    Output(#[from] crate::output::OutputError),
}
