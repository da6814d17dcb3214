//! Pull request title standardization.

use crate::keys::IssueKey;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::warn;

/// Longest title we write back.
pub const MAX_TITLE_CHARS: usize = 71;

/// Leading key list, a separator, then the free-form title.
static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\[?(?:[A-Za-z0-9]+-[0-9]+[, ]*)+[-:_ \]]+(?P<title>.*)$")
        .expect("title pattern is valid")
});

/// Result of standardizing a pull request title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TitleOutcome {
    /// The title was rewritten.
    Standardized {
        /// Full new title.
        title: String,
        /// Title text without the key prefix.
        suffix: String,
    },

    /// The title is kept as is.
    Unchanged {
        /// Why standardization did not apply.
        reason: String,
    },
}

impl TitleOutcome {
    fn unchanged(reason: &str) -> Self {
        warn!(reason, "Pull request title left unchanged");
        Self::Unchanged {
            reason: reason.to_string(),
        }
    }
}

/// Rewrites `title` as `"KEY-1, KEY-2: Title"` using `keys`.
///
/// The title must start with at least one key (optionally bracketed)
/// followed by a separator. The remaining text gets its first character
/// uppercased; the result is cut to [`MAX_TITLE_CHARS`].
#[must_use]
pub fn standardize_pr_title(title: &str, keys: &[IssueKey]) -> TitleOutcome {
    if keys.is_empty() {
        return TitleOutcome::unchanged("no issue keys to prefix");
    }

    let Some(caps) = TITLE_PATTERN.captures(title.trim()) else {
        return TitleOutcome::unchanged("title does not start with an issue key");
    };

    let suffix = uppercase_first(caps["title"].trim());
    if suffix.is_empty() {
        return TitleOutcome::unchanged("title has no text after the issue keys");
    }

    let keys = keys
        .iter()
        .map(IssueKey::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let title = format!("{keys}: {suffix}")
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();

    TitleOutcome::Standardized { title, suffix }
}

fn uppercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
