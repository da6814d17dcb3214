//! Settings file deserialization.

use super::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Parsed settings file.
///
/// ```toml
/// [jira]
/// base-url = "https://acme.atlassian.net"
/// email = "bot@acme.io"
/// token = "..."
///
/// [templates]
/// release-notes = "- {{key}}: {{summary}}"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SettingsFile {
    pub jira: JiraSettings,
    pub templates: TemplateSettings,
}

/// Jira connection settings. Every field may also come from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct JiraSettings {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TemplateSettings {
    /// Handlebars template for one release notes line.
    pub release_notes: Option<String>,
}

/// Validated Jira connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraCredentials {
    pub base_url: String,
    pub email: String,
    pub token: String,
}

impl SettingsFile {
    /// Loads settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IoError`] if the file cannot be read or
    /// [`ConfigError::TomlError`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading settings file");
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Like [`SettingsFile::load`], but a missing file yields default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

impl JiraSettings {
    /// Layers `overrides` on top of these settings. Blank overrides are ignored.
    #[must_use]
    pub fn with_overrides(self, overrides: JiraSettings) -> Self {
        Self {
            base_url: pick(overrides.base_url, self.base_url),
            email: pick(overrides.email, self.email),
            token: pick(overrides.token, self.token),
        }
    }

    /// Checks that every field is present and the base URL uses https.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad field.
    pub fn validate(&self) -> Result<JiraCredentials, ConfigError> {
        let base_url = required("jira.base-url", &self.base_url)?;
        let email = required("jira.email", &self.email)?;
        let token = required("jira.token", &self.token)?;

        let parsed = Url::parse(base_url).map_err(|e| ConfigError::ValidationError {
            field: "jira.base-url",
            message: e.to_string(),
        })?;
        if parsed.scheme() != "https" {
            return Err(ConfigError::ValidationError {
                field: "jira.base-url",
                message: format!("must use https, got '{}'", parsed.scheme()),
            });
        }

        Ok(JiraCredentials {
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
            token: token.to_string(),
        })
    }
}

fn pick(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    preferred
        .filter(|value| !value.trim().is_empty())
        .or(fallback)
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::ValidationError {
            field,
            message: "must be set".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings(base_url: &str) -> JiraSettings {
        JiraSettings {
            base_url: Some(base_url.to_string()),
            email: Some("bot@acme.io".to_string()),
            token: Some("secret".to_string()),
        }
    }

    #[test]
    fn loads_settings_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[jira]
base-url = "https://acme.atlassian.net"
email = "bot@acme.io"

[templates]
release-notes = "- {{key}}"
"#,
        )
        .unwrap();

        let file = SettingsFile::load(&path).unwrap();
        assert_eq!(file.jira.base_url.as_deref(), Some("https://acme.atlassian.net"));
        assert_eq!(file.jira.token, None);
        assert_eq!(file.templates.release_notes.as_deref(), Some("- {{key}}"));
    }

    #[test]
    fn missing_file_is_default_only_when_optional() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");

        let file = SettingsFile::load_or_default(&path).unwrap();
        assert_eq!(file.jira, JiraSettings::default());
        assert!(matches!(
            SettingsFile::load(&path),
            Err(ConfigError::IoError { .. })
        ));
    }

    #[test]
    fn rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[jira]\nbase_url = \"https://x\"\n").unwrap();

        assert!(matches!(
            SettingsFile::load(&path),
            Err(ConfigError::TomlError { .. })
        ));
    }

    #[test]
    fn overrides_win_unless_blank() {
        let merged = settings("https://file.atlassian.net").with_overrides(JiraSettings {
            base_url: Some("https://cli.atlassian.net".to_string()),
            email: Some("  ".to_string()),
            token: None,
        });
        assert_eq!(merged.base_url.as_deref(), Some("https://cli.atlassian.net"));
        assert_eq!(merged.email.as_deref(), Some("bot@acme.io"));
        assert_eq!(merged.token.as_deref(), Some("secret"));
    }

    #[test]
    fn validates_credentials() {
        let credentials = settings("https://acme.atlassian.net/").validate().unwrap();
        assert_eq!(credentials.base_url, "https://acme.atlassian.net");
        assert_eq!(credentials.email, "bot@acme.io");
    }

    #[test]
    fn rejects_plain_http() {
        let result = settings("http://acme.atlassian.net").validate();
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { field: "jira.base-url", .. })
        ));
    }

    #[test]
    fn rejects_missing_fields() {
        let mut jira = settings("https://acme.atlassian.net");
        jira.token = Some(String::new());
        assert!(matches!(
            jira.validate(),
            Err(ConfigError::ValidationError { field: "jira.token", .. })
        ));

        assert!(matches!(
            JiraSettings::default().validate(),
            Err(ConfigError::ValidationError { field: "jira.base-url", .. })
        ));
    }
}
