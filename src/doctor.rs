use anyhow::Result;

use crate::config::{ANTHROPIC_API_KEY_ENV, MISSING_API_KEY_MESSAGE, RuntimeConfig};
use crate::mcp::{BRIGHTDATA_TOKEN_ENV, effective_mcp_servers};
use crate::provider::{DEFAULT_MODEL, env_present};
use crate::tools::firecrawl::FIRECRAWL_API_KEY_ENV;

pub fn run_doctor(cfg: &RuntimeConfig) -> Result<()> {
    println!(
        "Active profile: '{}' (config: {})",
        cfg.profile, cfg.config_path
    );
    println!("Env file: {}", cfg.env_file);

    let checks = [
        (
            ANTHROPIC_API_KEY_ENV,
            env_present(ANTHROPIC_API_KEY_ENV),
            "required",
        ),
        (
            FIRECRAWL_API_KEY_ENV,
            env_present(FIRECRAWL_API_KEY_ENV),
            "optional, company website scraping",
        ),
        (
            BRIGHTDATA_TOKEN_ENV,
            env_present(BRIGHTDATA_TOKEN_ENV),
            "optional, individual/activity data retrieval",
        ),
    ];

    println!("Credential environment check:");
    for (key, ok, note) in checks {
        let status = if ok { "set" } else { "missing" };
        println!("- {key}: {status} ({note})");
    }

    println!("Model: {}", cfg.model.as_deref().unwrap_or(DEFAULT_MODEL));
    println!(
        "Output: stream={} show_member_responses={}",
        cfg.stream, cfg.show_member_responses
    );
    println!(
        "Tool policy: timeout_secs={} retry_attempts={} retry_delay_ms={} crawl_page_limit={} search_result_limit={}",
        cfg.tool_timeout_secs,
        cfg.tool_retry_attempts,
        cfg.tool_retry_delay_ms,
        cfg.crawl_page_limit,
        cfg.search_result_limit
    );
    println!(
        "Request guard: max_request_chars={} content_budget_chars={}",
        cfg.max_request_chars, cfg.content_budget_chars
    );
    println!(
        "Telemetry: enabled={} path={}",
        cfg.telemetry_enabled, cfg.telemetry_path
    );

    let servers = effective_mcp_servers(cfg);
    println!("MCP servers: enabled={}", servers.len());
    for server in servers {
        println!("- {} endpoint={}", server.name, server.endpoint);
    }

    if !env_present(ANTHROPIC_API_KEY_ENV) {
        println!();
        println!("{MISSING_API_KEY_MESSAGE}");
    }

    Ok(())
}
