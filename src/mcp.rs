use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use adk_rust::ReadonlyContext;
use adk_rust::prelude::*;
use adk_tool::mcp::RefreshConfig;
use adk_tool::{McpAuth, McpHttpClientBuilder};
use anyhow::{Context, Result};

use crate::config::{McpServerConfig, RuntimeConfig};
use crate::provider::env_present;

/// The original workflow reached LinkedIn-grade individual data through a
/// BrightData MCP server; when nothing is configured but the token is present
/// we synthesize that entry so zero-config runs keep working.
pub const BRIGHTDATA_SERVER_NAME: &str = "brightdata";
pub const BRIGHTDATA_TOKEN_ENV: &str = "BRIGHTDATA_API_TOKEN";
pub const BRIGHTDATA_DEFAULT_ENDPOINT: &str = "https://mcp.brightdata.com/mcp";

const DEFAULT_MCP_TIMEOUT_SECS: u64 = 15;

/// Retry settings applied to MCP toolset refreshes.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(cfg: &RuntimeConfig) -> Self {
        Self {
            attempts: cfg.tool_retry_attempts.max(1),
            delay_ms: cfg.tool_retry_delay_ms,
        }
    }
}

#[derive(Debug)]
struct McpDiscoveryContext {
    user_content: Content,
}

impl Default for McpDiscoveryContext {
    fn default() -> Self {
        Self {
            user_content: Content::new("user").with_text("discover enrichment tools"),
        }
    }
}

impl ReadonlyContext for McpDiscoveryContext {
    fn invocation_id(&self) -> &str {
        "mcp-discovery"
    }
    fn agent_name(&self) -> &str {
        "enrichment-toolset"
    }
    fn user_id(&self) -> &str {
        "local-user"
    }
    fn app_name(&self) -> &str {
        "enrich-cli"
    }
    fn session_id(&self) -> &str {
        "mcp-discovery"
    }
    fn branch(&self) -> &str {
        "main"
    }
    fn user_content(&self) -> &Content {
        &self.user_content
    }
}

fn default_brightdata_server() -> McpServerConfig {
    McpServerConfig {
        name: BRIGHTDATA_SERVER_NAME.to_string(),
        endpoint: BRIGHTDATA_DEFAULT_ENDPOINT.to_string(),
        enabled: Some(true),
        timeout_secs: None,
        auth_bearer_env: Some(BRIGHTDATA_TOKEN_ENV.to_string()),
        tool_allowlist: Vec::new(),
    }
}

/// Configured servers win; the BrightData default only fills an empty
/// configuration when its token is available.
pub fn effective_mcp_servers(cfg: &RuntimeConfig) -> Vec<McpServerConfig> {
    if cfg.mcp_servers.is_empty() {
        if env_present(BRIGHTDATA_TOKEN_ENV) {
            return vec![default_brightdata_server()];
        }
        return Vec::new();
    }

    cfg.mcp_servers
        .iter()
        .filter(|server| server.enabled.unwrap_or(true))
        .cloned()
        .collect()
}

pub fn select_mcp_servers(
    cfg: &RuntimeConfig,
    server_name: Option<&str>,
) -> Result<Vec<McpServerConfig>> {
    let active = effective_mcp_servers(cfg);
    match server_name {
        None => Ok(active),
        Some(name) => active
            .into_iter()
            .find(|server| server.name == name)
            .map(|server| vec![server])
            .ok_or_else(|| anyhow::anyhow!("MCP server '{name}' not found or not enabled")),
    }
}

/// Resolves the bearer token named by the server config, if any.
pub fn bearer_token(server: &McpServerConfig) -> Result<Option<String>> {
    let Some(env_key) = server.auth_bearer_env.as_deref() else {
        return Ok(None);
    };

    match std::env::var(env_key) {
        Ok(token) if !token.trim().is_empty() => Ok(Some(token)),
        Ok(_) => Err(anyhow::anyhow!(
            "MCP server '{}' has an empty bearer token in env '{}'",
            server.name,
            env_key
        )),
        Err(_) => Err(anyhow::anyhow!(
            "MCP server '{}' needs bearer token env '{}', which is unset",
            server.name,
            env_key
        )),
    }
}

pub async fn discover_mcp_tools_for_server(
    server: &McpServerConfig,
    retry: RetryPolicy,
) -> Result<Vec<Arc<dyn Tool>>> {
    let timeout = Duration::from_secs(server.timeout_secs.unwrap_or(DEFAULT_MCP_TIMEOUT_SECS));
    let mut builder = McpHttpClientBuilder::new(server.endpoint.clone()).timeout(timeout);
    if let Some(token) = bearer_token(server)? {
        builder = builder.with_auth(McpAuth::bearer(token));
    }

    let connected = builder.connect().await.with_context(|| {
        format!(
            "failed to connect to MCP server '{}' at {}",
            server.name, server.endpoint
        )
    })?;

    let mut toolset = connected.with_name(format!("mcp:{}", server.name)).with_refresh_config(
        RefreshConfig::default()
            .with_max_attempts(retry.attempts)
            .with_retry_delay_ms(retry.delay_ms),
    );

    if !server.tool_allowlist.is_empty() {
        let allowed = server
            .tool_allowlist
            .iter()
            .cloned()
            .collect::<BTreeSet<String>>();
        toolset = toolset.with_filter(move |tool_name| allowed.contains(tool_name));
    }

    let ctx: Arc<dyn ReadonlyContext> = Arc::new(McpDiscoveryContext::default());
    toolset.tools(ctx).await.with_context(|| {
        format!(
            "failed to discover MCP tools from '{}' ({})",
            server.name, server.endpoint
        )
    })
}

/// Discovery failures degrade to a warning: the research agents are told to
/// note unavailable data rather than abort the run.
pub async fn discover_mcp_tools(cfg: &RuntimeConfig) -> Vec<Arc<dyn Tool>> {
    let retry = RetryPolicy::from_config(cfg);
    let mut discovered = Vec::<Arc<dyn Tool>>::new();

    for server in effective_mcp_servers(cfg) {
        match discover_mcp_tools_for_server(&server, retry).await {
            Ok(mut tools) => {
                tracing::info!(
                    server = %server.name,
                    tools = tools.len(),
                    "MCP toolset ready"
                );
                discovered.append(&mut tools);
            }
            Err(err) => {
                tracing::warn!(
                    server = %server.name,
                    endpoint = %server.endpoint,
                    error = %err,
                    "skipping unreachable MCP server"
                );
            }
        }
    }

    discovered
}

pub async fn run_mcp_list(cfg: &RuntimeConfig) -> Result<()> {
    let servers = effective_mcp_servers(cfg);
    if servers.is_empty() {
        println!(
            "No enabled MCP servers for profile '{}'. Configure [profiles.{}.mcp_servers] or set {}.",
            cfg.profile, cfg.profile, BRIGHTDATA_TOKEN_ENV
        );
        return Ok(());
    }

    let retry = RetryPolicy::from_config(cfg);
    println!(
        "Enabled MCP servers for profile '{}' (refresh retries: {} x {}ms):",
        cfg.profile, retry.attempts, retry.delay_ms
    );
    for server in servers {
        let allowlist = match server.tool_allowlist.len() {
            0 => "<all>".to_string(),
            _ => server.tool_allowlist.join(","),
        };
        println!(
            "- {} endpoint={} timeout={}s auth_env={} allowlist={}",
            server.name,
            server.endpoint,
            server.timeout_secs.unwrap_or(DEFAULT_MCP_TIMEOUT_SECS),
            server.auth_bearer_env.as_deref().unwrap_or("<none>"),
            allowlist
        );
    }

    Ok(())
}

pub async fn run_mcp_discover(cfg: &RuntimeConfig, server_name: Option<String>) -> Result<()> {
    let servers = select_mcp_servers(cfg, server_name.as_deref())?;
    if servers.is_empty() {
        println!("No enabled MCP servers configured for discovery.");
        return Ok(());
    }

    let retry = RetryPolicy::from_config(cfg);
    let mut failures = 0usize;
    for server in servers {
        match discover_mcp_tools_for_server(&server, retry).await {
            Ok(tools) => {
                println!(
                    "MCP server '{}' reachable with {} tool(s):",
                    server.name,
                    tools.len()
                );
                for tool in tools {
                    println!("- {}", tool.name());
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!(
                    "[TOOLING] MCP discovery failed for '{}' ({}): {}",
                    server.name, server.endpoint, err
                );
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!(
            "MCP discovery completed with {failures} failure(s). Check endpoint/auth and retry."
        ));
    }

    Ok(())
}
