use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;

pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Fixed remediation text for the one fatal local error: a missing credential.
pub const MISSING_API_KEY_MESSAGE: &str = "ANTHROPIC_API_KEY not found. \
Ensure your .env.local file exists in the directory you run enrich-cli from and contains:\n\
\n\
  ANTHROPIC_API_KEY=your-api-key-here\n\
\n\
An exported ANTHROPIC_API_KEY environment variable also works. \
Use --env-file to load a different env file.";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub profile: String,
    pub config_path: String,
    pub env_file: String,
    pub model: Option<String>,
    pub stream: bool,
    pub show_member_responses: bool,
    pub show_sensitive_config: bool,
    pub tool_timeout_secs: u64,
    pub tool_retry_attempts: u32,
    pub tool_retry_delay_ms: u64,
    pub crawl_page_limit: u32,
    pub search_result_limit: usize,
    pub content_budget_chars: usize,
    pub max_request_chars: usize,
    pub telemetry_enabled: bool,
    pub telemetry_path: String,
    pub mcp_servers: Vec<McpServerConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilesFile {
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileConfig {
    pub model: Option<String>,
    pub stream: Option<bool>,
    pub show_member_responses: Option<bool>,
    pub tool_timeout_secs: Option<u64>,
    pub tool_retry_attempts: Option<u32>,
    pub tool_retry_delay_ms: Option<u64>,
    pub crawl_page_limit: Option<u32>,
    pub search_result_limit: Option<usize>,
    pub content_budget_chars: Option<usize>,
    pub max_request_chars: Option<usize>,
    pub telemetry_enabled: Option<bool>,
    pub telemetry_path: Option<String>,
    #[serde(default)]
    pub mcp_servers: Vec<McpServerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct McpServerConfig {
    pub name: String,
    pub endpoint: String,
    pub enabled: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub auth_bearer_env: Option<String>,
    #[serde(default)]
    pub tool_allowlist: Vec<String>,
}

pub fn load_profiles(config_path: &str) -> Result<ProfilesFile> {
    let path = Path::new(config_path);
    if !path.exists() {
        return Ok(ProfilesFile::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile config file at '{}'", path.display()))?;
    toml::from_str::<ProfilesFile>(&content).with_context(|| {
        format!(
            "invalid profile configuration in '{}'. Check field names and MCP server settings.",
            path.display()
        )
    })
}

/// CLI > profile > default.
fn pick<T>(cli_value: Option<T>, profile_value: Option<T>, default: T) -> T {
    cli_value.or(profile_value).unwrap_or(default)
}

fn selected_profile(cli: &Cli, profiles: &ProfilesFile) -> Result<ProfileConfig> {
    let selected = cli.profile.trim();
    if selected.is_empty() {
        return Err(anyhow::anyhow!(
            "profile name cannot be empty. Set --profile <name>."
        ));
    }

    if let Some(profile) = profiles.profiles.get(selected) {
        return Ok(profile.clone());
    }

    // An absent 'default' profile is not an error; everything has defaults.
    if selected == "default" {
        return Ok(ProfileConfig::default());
    }

    let mut names = profiles.profiles.keys().cloned().collect::<Vec<String>>();
    names.sort();
    Err(if names.is_empty() {
        anyhow::anyhow!(
            "profile '{}' not found in '{}'. No profiles are defined yet.",
            selected,
            cli.config_path
        )
    } else {
        anyhow::anyhow!(
            "profile '{}' not found in '{}'. Available profiles: {}",
            selected,
            cli.config_path,
            names.join(", ")
        )
    })
}

pub fn resolve_runtime_config(cli: &Cli, profiles: &ProfilesFile) -> Result<RuntimeConfig> {
    let profile = selected_profile(cli, profiles)?;

    let stream = if cli.no_stream {
        false
    } else {
        profile.stream.unwrap_or(true)
    };

    Ok(RuntimeConfig {
        profile: cli.profile.trim().to_string(),
        config_path: cli.config_path.clone(),
        env_file: cli.env_file.clone(),
        model: cli.model.clone().or(profile.model),
        stream,
        show_member_responses: pick(
            cli.show_member_responses,
            profile.show_member_responses,
            true,
        ),
        show_sensitive_config: cli.show_sensitive_config,
        tool_timeout_secs: pick(cli.tool_timeout_secs, profile.tool_timeout_secs, 45).max(1),
        tool_retry_attempts: pick(cli.tool_retry_attempts, profile.tool_retry_attempts, 2).max(1),
        tool_retry_delay_ms: pick(cli.tool_retry_delay_ms, profile.tool_retry_delay_ms, 500),
        crawl_page_limit: pick(cli.crawl_page_limit, profile.crawl_page_limit, 5).max(1),
        search_result_limit: pick(cli.search_result_limit, profile.search_result_limit, 5)
            .clamp(1, 10),
        content_budget_chars: profile.content_budget_chars.unwrap_or(8_000).max(256),
        max_request_chars: profile.max_request_chars.unwrap_or(32_000).max(1_024),
        telemetry_enabled: pick(cli.telemetry_enabled, profile.telemetry_enabled, true),
        telemetry_path: pick(
            cli.telemetry_path.clone(),
            profile.telemetry_path,
            ".enrich/telemetry/events.jsonl".to_string(),
        ),
        mcp_servers: profile.mcp_servers,
    })
}

/// Loads the configured env file if it exists. Missing files are fine; the
/// process environment may already carry the credential.
pub fn load_env_file(path: &str) {
    let path = Path::new(path);
    if path.exists() {
        match dotenvy::from_path(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "loaded env file"),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to load env file")
            }
        }
    }
}

pub fn require_anthropic_api_key() -> Result<String> {
    api_key_from(std::env::var(ANTHROPIC_API_KEY_ENV).ok())
}

pub fn api_key_from(value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!(MISSING_API_KEY_MESSAGE))
}
