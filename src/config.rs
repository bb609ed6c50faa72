use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ReviewError;

/// Tunables from `.diffsage.yml`, overridable from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: usize,

    #[serde(default = "default_max_diff_chars")]
    pub max_diff_chars: usize,

    pub gemini_base_url: Option<String>,
    pub github_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            max_diff_chars: default_max_diff_chars(),
            gemini_base_url: None,
            github_base_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ReviewError> {
        for name in [".diffsage.yml", ".diffsage.yaml"] {
            let config_path = PathBuf::from(name);
            if config_path.exists() {
                return Self::read_file(&config_path);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".diffsage.yml");
            if home_config.exists() {
                return Self::read_file(&home_config);
            }
        }

        Ok(Config::default())
    }

    fn read_file(path: &PathBuf) -> Result<Self, ReviewError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ReviewError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    pub fn merge_with_cli(&mut self, cli_model: Option<String>) {
        if let Some(model) = cli_model {
            self.model = model;
        }
    }
}

/// Where the review goes: repository, PR number, and the token that
/// authenticates the comment POST.
///
/// Resolved once at startup and handed to the publisher, instead of the
/// publisher reading the process environment itself.
#[derive(Debug, Clone)]
pub struct PublishTarget {
    pub repo: String,
    pub pr_number: u64,
    pub github_token: String,
}

impl PublishTarget {
    /// Resolve from `REPO`, `PR_NUMBER` and `GITHUB_TOKEN`, with CLI
    /// overrides for the first two.
    pub fn from_env(
        repo_override: Option<String>,
        pr_override: Option<u64>,
    ) -> Result<Self, ReviewError> {
        let repo = match repo_override {
            Some(r) => r,
            None => require_env("REPO")?,
        };
        let pr_number = match pr_override {
            Some(n) => n,
            None => parse_pr_number(&require_env("PR_NUMBER")?)?,
        };
        let github_token = require_env("GITHUB_TOKEN")?;

        Ok(Self {
            repo,
            pr_number,
            github_token,
        })
    }
}

pub fn gemini_api_key() -> Result<String, ReviewError> {
    require_env("GEMINI_API_KEY")
}

fn require_env(name: &str) -> Result<String, ReviewError> {
    required(name, std::env::var(name).ok())
}

fn required(name: &str, value: Option<String>) -> Result<String, ReviewError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ReviewError::Config(format!(
            "{name} not set. export {name}=... before running"
        ))),
    }
}

fn parse_pr_number(raw: &str) -> Result<u64, ReviewError> {
    raw.trim()
        .parse()
        .map_err(|_| ReviewError::Config(format!("invalid PR number: {raw}")))
}

fn default_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_output_tokens() -> usize {
    4000
}

fn default_max_diff_chars() -> usize {
    240_000
}
