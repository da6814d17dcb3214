//! Template error types.

/// Release notes rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Handlebars rendering error.
    #[error("Release notes rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// The configured line template does not parse.
    #[error("Invalid release notes template: {0}")]
    RegistrationError(#[from] handlebars::TemplateError),
}
