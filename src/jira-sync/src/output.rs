//! GitHub Actions step outputs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable naming the outputs file.
pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";

const DELIMITER: &str = "JIRA_SYNC_EOF";

/// Failure to append to the outputs file.
#[derive(Debug, Error)]
#[error("Failed to write output '{name}' to {}: {source}", path.display())]
pub struct OutputError {
    name: String,
    path: PathBuf,
    #[source]
    source: std::io::Error,
}

/// Writes step outputs to the file named by `GITHUB_OUTPUT`, or logs them
/// when running outside Actions.
#[derive(Debug, Clone, Default)]
pub struct ActionOutput {
    path: Option<PathBuf>,
}

impl ActionOutput {
    /// Uses the outputs file from the environment, if set.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(OUTPUT_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Appends outputs to `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The outputs file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Sets output `name` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if the outputs file cannot be appended to.
    pub fn set(&self, name: &str, value: &str) -> Result<(), OutputError> {
        let Some(path) = &self.path else {
            info!(name, value, "Step output");
            return Ok(());
        };

        let to_error = |source| OutputError {
            name: name.to_string(),
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(to_error)?;
        file.write_all(format_entry(name, value).as_bytes())
            .map_err(to_error)
    }
}

fn format_entry(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }

    let mut delimiter = DELIMITER.to_string();
    let mut attempt = 0;
    while value.contains(&delimiter) {
        attempt += 1;
        delimiter = format!("{DELIMITER}_{attempt}");
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}
