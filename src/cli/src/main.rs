//! CLI for jira-sync.
//!
//! Runs inside a GitHub Actions job: links the Jira issues mentioned in the
//! current commits and pull request, moves them along the workflow and
//! publishes release notes as step outputs.

use clap::{Parser, ValueEnum};
use jira_sync::transitions::TransitionTargets;
use jira_sync::{
    default_settings_path, ActionOutput, GithubEvent, JiraClient, JiraSettings, OctocrabGithub,
    Refs, RunOutcome, Runner, RunnerConfig, RunnerError, SearchSource, SettingsFile,
    TransitionChain,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// jira-sync - Link Jira issues to GitHub commits and pull requests.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file [default: $HOME/jira/config.toml].
    #[arg(long)]
    config: Option<PathBuf>,

    /// Jira site URL, e.g. https://acme.atlassian.net.
    #[arg(long, env = "JIRA_BASE_URL")]
    jira_base_url: Option<String>,

    /// Jira account email.
    #[arg(long, env = "JIRA_USER_EMAIL")]
    jira_user_email: Option<String>,

    /// Jira API token.
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    jira_api_token: Option<String>,

    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Repository as owner/name.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: String,

    /// Name of the triggering event.
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "")]
    event_name: String,

    /// Path to the event payload.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Fix version to attach to issues and use as the milestone title.
    #[arg(long)]
    fix_version: Option<String>,

    /// Comma separated workflow states or transition ids, in order.
    #[arg(long, default_value = "")]
    transition_chain: String,

    /// Target state when a branch is created.
    #[arg(long)]
    transition_on_new_branch: Option<String>,

    /// Target state when a pull request is opened.
    #[arg(long)]
    transition_on_pr_open: Option<String>,

    /// Target state when a pull request is approved.
    #[arg(long)]
    transition_on_pr_approval: Option<String>,

    /// Target state when a pull request is merged.
    #[arg(long)]
    transition_on_pr_merge: Option<String>,

    /// Also take keys from merge commit messages.
    #[arg(long)]
    include_merge_messages: bool,

    /// Rewrite the pull request title as "KEY-1, KEY-2: Title".
    #[arg(long)]
    standardize_pr_title: bool,

    /// Look up the first issue key in this string instead of scanning commits.
    #[arg(long)]
    string: Option<String>,

    /// Event field searched when the commit range has no keys.
    #[arg(long, value_enum, default_value_t = SearchFrom::Commits)]
    from: SearchFrom,

    /// Head ref override.
    #[arg(long)]
    head_ref: Option<String>,

    /// Base ref override.
    #[arg(long)]
    base_ref: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SearchFrom {
    Commits,
    Branch,
    PullRequest,
}

impl SearchFrom {
    fn source(self) -> SearchSource {
        match self {
            Self::Commits => SearchSource::Commits,
            Self::Branch => SearchSource::Branch,
            Self::PullRequest => SearchSource::PullRequest,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // octocrab and reqwest both go through rustls; pick the provider up front.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    let result = run(args).await;
    match &result {
        Ok(outcome) => print_outcome(outcome),
        Err(e) => error!(error = %e, "Critical failure"),
    }
    ExitCode::from(exit_code(&result))
}

/// Maps a run result to the process exit code.
///
/// Per-issue transition failures are already logged and do not fail the
/// step; only errors that aborted the run do.
fn exit_code(result: &Result<RunOutcome, RunnerError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 2,
    }
}

/// Installs a compact subscriber filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn run(args: Args) -> Result<RunOutcome, RunnerError> {
    let settings = match args.config.as_deref() {
        Some(path) => SettingsFile::load(path)?,
        None => match default_settings_path() {
            Some(path) => SettingsFile::load_or_default(&path)?,
            None => SettingsFile::default(),
        },
    };

    let credentials = settings
        .jira
        .with_overrides(JiraSettings {
            base_url: args.jira_base_url,
            email: args.jira_user_email,
            token: args.jira_api_token,
        })
        .validate()?;

    let event = match args.event_path.as_deref() {
        Some(path) => GithubEvent::load(path)?,
        None => {
            warn!("No event payload given, continuing with an empty event");
            GithubEvent::default()
        }
    };

    let jira = JiraClient::new(
        &credentials.base_url,
        credentials.email,
        credentials.token,
    )?;
    let github = OctocrabGithub::new(&args.github_token, &args.repository)?;

    let config = RunnerConfig::new(args.event_name, event, credentials.base_url)
        .with_fix_version(args.fix_version)
        .with_transition_chain(TransitionChain::parse(&args.transition_chain))
        .with_transition_targets(TransitionTargets {
            on_new_branch: args.transition_on_new_branch,
            on_pr_open: args.transition_on_pr_open,
            on_pr_approval: args.transition_on_pr_approval,
            on_pr_merge: args.transition_on_pr_merge,
        })
        .with_merge_messages(args.include_merge_messages)
        .with_pr_title_standardization(args.standardize_pr_title)
        .with_search_string(args.string)
        .with_search_source(args.from.source())
        .with_ref_overrides(Refs {
            head: args.head_ref,
            base: args.base_ref,
        })
        .with_release_notes_template(settings.templates.release_notes);

    let runner = Runner::new(config, Arc::new(jira), Arc::new(github))?;
    let outcome = runner.run().await?;
    outcome.write_outputs(&ActionOutput::from_env())?;
    Ok(outcome)
}

/// Prints the final run summary.
fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Linked(report) => {
            let summary = &report.summary;
            println!("\nSummary:");
            println!("  Keys found: {}", summary.keys_found);
            println!("  Issues resolved: {}", summary.issues_resolved);
            println!("  Issues missing in Jira: {}", summary.issues_missing);
            println!("  Transitions applied: {}", summary.transitions_applied);
            println!("  Transitions skipped: {}", summary.transitions_skipped);
            println!("  Issues with failed transitions: {}", summary.transitions_failed);
            println!("  Issues mirrored: {}", summary.issues_mirrored);
            println!(
                "  Pull request updated: {}",
                if summary.pull_request_updated { "yes" } else { "no" }
            );
            if summary.has_failures() {
                warn!(
                    issues = summary.transitions_failed,
                    "Some issues could not be transitioned, see warnings above"
                );
            }
        }
        RunOutcome::Single(record) => info!(key = %record.key(), "Found issue"),
        RunOutcome::NoKeys => info!("No issue keys found"),
    }
}
