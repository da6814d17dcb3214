#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod github;
pub mod jira;
pub mod keys;
pub mod merge;
pub mod output;
pub mod record;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod transitions;

pub use config::{default_settings_path, ConfigError, JiraCredentials, JiraSettings, SettingsFile};
pub use github::{
    GithubApi, GithubError, GithubEvent, GithubMirror, MirrorError, OctocrabGithub, Refs,
    SearchSource,
};
pub use jira::{ApiVersion, IssuePayload, IssueQuery, JiraApi, JiraClient, JiraError, Transition};
pub use keys::{collect_keys, extract_keys, is_merge_commit, IssueKey, KeyCollector, KeySources};
pub use merge::{merge_region, END_TOKEN, START_TOKEN};
pub use output::{ActionOutput, OutputError};
pub use record::{jira_to_markdown, normalize, IssueRecord, RecordError};
pub use runner::{RunOutcome, RunReport, Runner, RunnerConfig, RunnerError};
pub use summary::RunSummary;
pub use templates::{standardize_pr_title, ReleaseNotesRenderer, TemplateError, TitleOutcome};
pub use transitions::{
    select_transition, EventTrigger, TransitionChain, TransitionEngine, TransitionOutcome,
    TransitionReport, TransitionTargets,
};
