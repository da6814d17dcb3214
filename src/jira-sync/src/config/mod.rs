//! Settings file loading.
//!
//! Jira credentials and template overrides can live in a TOML file; the CLI
//! layers its own arguments on top.

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{JiraCredentials, JiraSettings, SettingsFile, TemplateSettings};

use std::path::PathBuf;

/// Default settings location: `$HOME/jira/config.toml`.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join("jira").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_under_home() {
        temp_env::with_var("HOME", Some("/home/ci"), || {
            assert_eq!(
                default_settings_path(),
                Some(PathBuf::from("/home/ci/jira/config.toml"))
            );
        });
    }

    #[test]
    fn no_default_path_without_home() {
        temp_env::with_var_unset("HOME", || {
            assert_eq!(default_settings_path(), None);
        });
    }
}
