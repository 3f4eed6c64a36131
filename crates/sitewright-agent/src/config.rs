use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "sitewright",
    about = "Rewrite a static site's index.html and style.css from an issue description",
    after_help = "Secrets are read from the environment only: GEMINI_API_KEY, GITHUB_TOKEN."
)]
pub struct AgentArgs {
    /// Gemini API key. Environment only, never a flag.
    #[arg(skip = std::env::var(API_KEY_ENV).ok())]
    pub api_key: Option<String>,

    /// GitHub token (accepted for workflow compatibility, not used).
    #[arg(skip = std::env::var(GITHUB_TOKEN_ENV).ok())]
    pub github_token: Option<String>,

    /// Repository identifier, e.g. "owner/site"
    #[arg(long, env = "REPO_NAME")]
    pub repo_name: Option<String>,

    /// Number of the issue that triggered the run
    #[arg(long, env = "ISSUE_NUMBER")]
    pub issue_number: Option<String>,

    /// Issue body describing the requested change
    #[arg(long, env = "ISSUE_BODY")]
    pub issue_body: Option<String>,

    /// Directory holding index.html and style.css
    #[arg(long, env = "SITEWRIGHT_SITE_DIR", default_value = ".")]
    pub site_dir: PathBuf,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "GEMINI_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Use this model and skip discovery
    #[arg(long, env = "SITEWRIGHT_MODEL")]
    pub model: Option<String>,

    /// Timeout for each API request (seconds)
    #[arg(
        long,
        env = "SITEWRIGHT_REQUEST_TIMEOUT",
        default_value = "600",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY not found")]
    MissingApiKey,

    #[error("ISSUE_NUMBER not set")]
    MissingIssueNumber,

    #[error("ISSUE_NUMBER is not a number: {0:?}")]
    InvalidIssueNumber(String),

    #[error("request timeout must be at least one second")]
    ZeroRequestTimeout,
}

/// Non-fatal gaps in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarning {
    MissingGithubToken,
    MissingRepoName,
    EmptyIssueBody,
}

impl ConfigWarning {
    pub fn message(&self) -> &'static str {
        match self {
            ConfigWarning::MissingGithubToken => "GITHUB_TOKEN not set",
            ConfigWarning::MissingRepoName => "REPO_NAME not set",
            ConfigWarning::EmptyIssueBody => "ISSUE_BODY is empty; the model gets no request text",
        }
    }
}

/// Validated configuration, built once at startup.
#[derive(Clone)]
pub struct AgentConfig {
    pub api_key: String,
    pub github_token: Option<String>,
    pub repo_name: Option<String>,
    pub issue_number: u64,
    pub issue_body: String,
    pub site_dir: PathBuf,
    pub api_base_url: String,
    pub model_override: Option<String>,
    pub request_timeout: Duration,
}

impl AgentConfig {
    pub fn from_args(args: AgentArgs) -> Result<Self, ConfigError> {
        let api_key = non_empty(args.api_key).ok_or(ConfigError::MissingApiKey)?;

        let raw_number = non_empty(args.issue_number).ok_or(ConfigError::MissingIssueNumber)?;
        let issue_number = raw_number
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidIssueNumber(raw_number.clone()))?;

        if args.request_timeout == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }

        Ok(Self {
            api_key,
            github_token: non_empty(args.github_token),
            repo_name: non_empty(args.repo_name),
            issue_number,
            issue_body: args.issue_body.unwrap_or_default(),
            site_dir: args.site_dir,
            api_base_url: args.api_base_url,
            model_override: non_empty(args.model),
            request_timeout: Duration::from_secs(args.request_timeout),
        })
    }

    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.github_token.is_none() {
            warnings.push(ConfigWarning::MissingGithubToken);
        }
        if self.repo_name.is_none() {
            warnings.push(ConfigWarning::MissingRepoName);
        }
        if self.issue_body.trim().is_empty() {
            warnings.push(ConfigWarning::EmptyIssueBody);
        }
        warnings
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("api_key", &"<redacted>")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("repo_name", &self.repo_name)
            .field("issue_number", &self.issue_number)
            .field("issue_body_len", &self.issue_body.len())
            .field("site_dir", &self.site_dir)
            .field("api_base_url", &self.api_base_url)
            .field("model_override", &self.model_override)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
