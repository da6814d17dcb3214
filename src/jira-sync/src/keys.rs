//! Issue key extraction.
//!
//! Keys are found with a single pattern and canonicalized to uppercase when
//! several sources are merged into one ordered, duplicate-free list.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Pattern matching a Jira issue key such as `API-123`.
pub const ISSUE_KEY_PATTERN: &str = "[A-Za-z0-9]+-[0-9]+";

static ISSUE_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ISSUE_KEY_PATTERN).expect("issue key pattern is valid"));

/// A canonical (uppercase) Jira issue key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IssueKey(String);

impl IssueKey {
    /// Canonicalizes a raw match into an issue key.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns every key-shaped substring of `text`, left to right, case preserved.
#[must_use]
pub fn extract_keys(text: &str) -> Vec<&str> {
    ISSUE_KEY_REGEX.find_iter(text).map(|m| m.as_str()).collect()
}

/// Returns true for the messages git and GitHub generate for merges.
#[must_use]
pub fn is_merge_commit(message: &str) -> bool {
    message.starts_with("Merge branch") || message.starts_with("Merge pull")
}

/// Accumulates keys from several sources, keeping the first-seen order.
#[derive(Debug, Default)]
pub struct KeyCollector {
    seen: HashSet<IssueKey>,
    keys: Vec<IssueKey>,
}

impl KeyCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every key found in `text`.
    pub fn push_text(&mut self, text: &str) {
        for raw in extract_keys(text) {
            let key = IssueKey::new(raw);
            if self.seen.insert(key.clone()) {
                self.keys.push(key);
            }
        }
    }

    /// Consumes the collector, returning keys in discovery order.
    #[must_use]
    pub fn into_keys(self) -> Vec<IssueKey> {
        self.keys
    }
}

/// The text sources scanned for keys during a git-range run.
#[derive(Debug, Clone, Default)]
pub struct KeySources<'a> {
    /// Pull request title, when the event is a pull request.
    pub pr_title: Option<&'a str>,

    /// Head branch or ref name.
    pub head_ref: Option<&'a str>,

    /// Commit messages in the compare range, oldest first.
    pub commit_messages: Vec<&'a str>,
}

/// Collects unique keys from all sources in precedence order.
///
/// Merge-commit messages are skipped unless `include_merge_messages` is set.
#[must_use]
pub fn collect_keys(sources: &KeySources<'_>, include_merge_messages: bool) -> Vec<IssueKey> {
    let mut collector = KeyCollector::new();

    if let Some(title) = sources.pr_title {
        collector.push_text(title);
    }
    if let Some(head_ref) = sources.head_ref {
        collector.push_text(head_ref);
    }

    for message in &sources.commit_messages {
        if is_merge_commit(message) && !include_merge_messages {
            debug!("Skipping merge commit message");
            continue;
        }
        collector.push_text(message);
    }

    collector.into_keys()
}
