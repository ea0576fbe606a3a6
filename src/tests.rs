use std::sync::Arc;
use std::time::Duration;

use adk_rust::LlmResponse;
use adk_rust::model::MockLlm;
use adk_rust::prelude::*;
use serde_json::{Value, json};
use tempfile::tempdir;

use crate::agents::summarizer::*;
use crate::agents::team::*;
use crate::agents::*;
use crate::cli::*;
use crate::config::*;
use crate::error::*;
use crate::leads::*;
use crate::mcp::*;
use crate::provider::*;
use crate::runner::*;
use crate::streaming::*;
use crate::telemetry::*;
use crate::tools::firecrawl::*;
use crate::tools::search::*;
use crate::tools::*;

fn base_cfg() -> RuntimeConfig {
    RuntimeConfig {
        profile: "default".to_string(),
        config_path: ".enrich/config.toml".to_string(),
        env_file: ".env.local".to_string(),
        model: None,
        stream: true,
        show_member_responses: true,
        show_sensitive_config: false,
        tool_timeout_secs: 45,
        tool_retry_attempts: 2,
        tool_retry_delay_ms: 500,
        crawl_page_limit: 5,
        search_result_limit: 5,
        content_budget_chars: 8_000,
        max_request_chars: 32_000,
        telemetry_enabled: false,
        telemetry_path: ".enrich/test-telemetry.jsonl".to_string(),
        mcp_servers: Vec::new(),
    }
}

fn test_cli(config_path: &str, profile: &str) -> Cli {
    Cli {
        model: None,
        profile: profile.to_string(),
        config_path: config_path.to_string(),
        env_file: ".env.local".to_string(),
        no_stream: false,
        show_member_responses: None,
        show_sensitive_config: false,
        tool_timeout_secs: None,
        tool_retry_attempts: None,
        tool_retry_delay_ms: None,
        crawl_page_limit: None,
        search_result_limit: None,
        telemetry_enabled: None,
        telemetry_path: None,
        log_filter: "error".to_string(),
        command: None,
    }
}

fn test_telemetry(cfg: &RuntimeConfig) -> TelemetrySink {
    TelemetrySink::new(cfg, "test".to_string())
}

fn mock_model(text: &str) -> Arc<dyn Llm> {
    Arc::new(
        MockLlm::new("mock").with_response(LlmResponse::new(Content::new("model").with_text(text))),
    )
}

fn batch_of(lines: &[&str]) -> LeadBatch {
    collect_leads(lines.iter().copied()).expect("batch should collect")
}

// ---------------------------------------------------------------------------
// Lead collection
// ---------------------------------------------------------------------------

#[test]
fn lead_collection_stops_on_sentinel() {
    let batch = collect_leads(["John Doe, Acme Corp", "done", "Ignored, After"])
        .expect("one lead should collect");
    assert_eq!(batch.lines(), ["John Doe, Acme Corp"]);
}

#[test]
fn lead_sentinel_matches_case_insensitively_after_trim() {
    let batch = collect_leads(["Jane Roe, Globex", "  DONE  "]).expect("lead should collect");
    assert_eq!(batch.len(), 1);
}

#[test]
fn blank_lines_before_any_lead_are_skipped() {
    let batch = collect_leads(["", "   ", "Jane Roe, Globex", "", "Late, Entry"])
        .expect("lead should collect");
    assert_eq!(
        batch.lines(),
        ["Jane Roe, Globex"],
        "blank line after the first lead should have submitted the batch"
    );
}

#[test]
fn lead_collection_returns_none_without_entries() {
    assert_eq!(collect_leads(["done"]), None);
    assert_eq!(collect_leads([""]), None);
    assert_eq!(collect_leads(Vec::<String>::new()), None);
}

#[test]
fn lead_lines_are_trimmed_and_order_preserved() {
    let batch = collect_leads(["  John Doe, Acme Corp  ", "Jane Roe, Globex", "done"])
        .expect("two leads should collect");
    assert_eq!(batch.lines(), ["John Doe, Acme Corp", "Jane Roe, Globex"]);
    assert_eq!(
        batch.bullet_block(),
        "- John Doe, Acme Corp\n- Jane Roe, Globex"
    );
}

#[test]
fn leads_file_follows_terminal_rules() {
    let dir = tempdir().expect("temp directory should create");
    let path = dir.path().join("leads.txt");
    std::fs::write(&path, "Alice Smith, Initech\nBob Jones, Hooli\ndone\nCarol, Ignored\n")
        .expect("leads file should write");

    let batch = read_leads_from_file(&path.to_string_lossy())
        .expect("leads file should read")
        .expect("two leads should collect");
    assert_eq!(batch.len(), 2);
}

#[test]
fn leads_file_eof_submits_collected_lines() {
    let dir = tempdir().expect("temp directory should create");
    let path = dir.path().join("leads.txt");
    std::fs::write(&path, "Alice Smith, Initech\n").expect("leads file should write");

    let batch = read_leads_from_file(&path.to_string_lossy())
        .expect("leads file should read")
        .expect("lead should collect");
    assert_eq!(batch.lines(), ["Alice Smith, Initech"]);
}

#[test]
fn missing_leads_file_is_an_input_error() {
    let err = read_leads_from_file("/definitely/not/here/leads.txt")
        .expect_err("missing file should fail");
    assert_eq!(categorize_error(&err), ErrorCategory::Input);
}

// ---------------------------------------------------------------------------
// Request assembly
// ---------------------------------------------------------------------------

#[test]
fn enrichment_request_embeds_exact_lead_block() {
    let batch = batch_of(&["John Doe, Acme Corp", "Jane Roe, Globex & Co"]);
    let request = build_enrichment_request(&batch);

    assert!(request.contains(&batch.bullet_block()));
    assert!(request.contains("- Jane Roe, Globex & Co"));
    assert!(request.starts_with("Please enrich the following leads"));
}

#[test]
fn oversized_request_is_rejected_before_any_service_call() {
    let request = "x".repeat(100);
    ensure_request_size(&request, 100).expect("at the limit should pass");

    let err = ensure_request_size(&request, 99).expect_err("over the limit should fail");
    assert_eq!(categorize_error(&err), ErrorCategory::Input);
}

// ---------------------------------------------------------------------------
// Credential handling
// ---------------------------------------------------------------------------

#[test]
fn missing_api_key_produces_fixed_remediation_message() {
    let err = api_key_from(None).expect_err("missing key should fail");
    assert_eq!(err.to_string(), MISSING_API_KEY_MESSAGE);
    assert_eq!(categorize_error(&err), ErrorCategory::Provider);
}

#[test]
fn blank_api_key_counts_as_missing() {
    let err = api_key_from(Some("   ".to_string())).expect_err("blank key should fail");
    assert_eq!(err.to_string(), MISSING_API_KEY_MESSAGE);
}

#[test]
fn api_key_is_trimmed() {
    let key = api_key_from(Some("  sk-ant-test123  ".to_string())).expect("key should resolve");
    assert_eq!(key, "sk-ant-test123");
}

#[test]
fn model_validation_requires_claude_prefix() {
    validate_model("claude-sonnet-4-20250514").expect("claude model should validate");
    let err = validate_model("gpt-4o-mini").expect_err("non-claude model should fail");
    assert_eq!(categorize_error(&err), ErrorCategory::Provider);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn runtime_config_defaults_apply_without_profile_file() {
    let cli = test_cli("/does/not/exist/config.toml", "default");
    let profiles = load_profiles(&cli.config_path).expect("missing file should default");
    let cfg = resolve_runtime_config(&cli, &profiles).expect("config should resolve");

    assert_eq!(cfg.model, None);
    assert!(cfg.stream);
    assert!(cfg.show_member_responses);
    assert_eq!(cfg.crawl_page_limit, 5);
    assert_eq!(cfg.search_result_limit, 5);
    assert_eq!(cfg.tool_timeout_secs, 45);
    assert_eq!(cfg.max_request_chars, 32_000);
    assert_eq!(cfg.telemetry_path, ".enrich/telemetry/events.jsonl");
}

#[test]
fn cli_flags_override_profile_values() {
    let dir = tempdir().expect("temp directory should create");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[profiles.default]
model = "claude-3-7-sonnet-latest"
stream = true
crawl_page_limit = 3
"#,
    )
    .expect("config should write");

    let mut cli = test_cli(&path.to_string_lossy(), "default");
    cli.model = Some("claude-sonnet-4-20250514".to_string());
    cli.no_stream = true;

    let profiles = load_profiles(&cli.config_path).expect("config should load");
    let cfg = resolve_runtime_config(&cli, &profiles).expect("config should resolve");

    assert_eq!(cfg.model.as_deref(), Some("claude-sonnet-4-20250514"));
    assert!(!cfg.stream, "--no-stream should beat the profile");
    assert_eq!(cfg.crawl_page_limit, 3);
}

#[test]
fn unknown_profile_fields_are_rejected() {
    let dir = tempdir().expect("temp directory should create");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[profiles.default]
modle = "typo"
"#,
    )
    .expect("config should write");

    let err = load_profiles(&path.to_string_lossy()).expect_err("typo field should fail");
    assert!(format!("{err:#}").contains("invalid profile configuration"));
}

#[test]
fn missing_profile_lists_available_names() {
    let dir = tempdir().expect("temp directory should create");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[profiles.sales]
model = "claude-sonnet-4-20250514"
"#,
    )
    .expect("config should write");

    let cli = test_cli(&path.to_string_lossy(), "marketing");
    let profiles = load_profiles(&cli.config_path).expect("config should load");
    let err = resolve_runtime_config(&cli, &profiles).expect_err("missing profile should fail");

    assert!(err.to_string().contains("sales"));
    assert_eq!(categorize_error(&err), ErrorCategory::Input);
}

#[test]
fn mcp_servers_parse_from_profile() {
    let dir = tempdir().expect("temp directory should create");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[profiles.default]

[[profiles.default.mcp_servers]]
name = "brightdata"
endpoint = "https://mcp.brightdata.com/mcp"
auth_bearer_env = "BRIGHTDATA_API_TOKEN"
tool_allowlist = ["search_engine", "scrape_as_markdown"]
"#,
    )
    .expect("config should write");

    let cli = test_cli(&path.to_string_lossy(), "default");
    let profiles = load_profiles(&cli.config_path).expect("config should load");
    let cfg = resolve_runtime_config(&cli, &profiles).expect("config should resolve");

    assert_eq!(cfg.mcp_servers.len(), 1);
    assert_eq!(cfg.mcp_servers[0].name, "brightdata");
    assert_eq!(cfg.mcp_servers[0].tool_allowlist.len(), 2);
}

// ---------------------------------------------------------------------------
// Error taxonomy and redaction
// ---------------------------------------------------------------------------

#[test]
fn error_categories_map_to_stable_codes() {
    let provider = anyhow::anyhow!("ANTHROPIC_API_KEY not found. Ensure your .env.local ...");
    assert_eq!(categorize_error(&provider), ErrorCategory::Provider);

    let input = anyhow::anyhow!("request exceeds the 32000-character limit");
    assert_eq!(categorize_error(&input), ErrorCategory::Input);

    let tooling = anyhow::anyhow!("MCP server 'brightdata' not found or not enabled");
    assert_eq!(categorize_error(&tooling), ErrorCategory::Tooling);

    let internal = anyhow::anyhow!("something unexpected");
    assert_eq!(categorize_error(&internal), ErrorCategory::Internal);
}

#[test]
fn cli_error_rendering_includes_code_and_hint() {
    let err = anyhow::anyhow!(MISSING_API_KEY_MESSAGE);
    let rendered = format_cli_error(&err, false);
    assert!(rendered.starts_with("[PROVIDER]"));
    assert!(rendered.contains("Hint:"));
}

#[test]
fn api_keys_are_redacted_from_error_output() {
    let text = "request failed with key sk-ant-abc123def (and fc-9981, too)";
    let redacted = redact_sensitive_text(text);
    assert_eq!(
        redacted,
        "request failed with key sk-ant-[REDACTED] (and fc-[REDACTED], too)"
    );

    let err = anyhow::anyhow!("auth rejected for sk-ant-topsecret999");
    assert!(!format_cli_error(&err, false).contains("topsecret999"));
    assert!(format_cli_error(&err, true).contains("topsecret999"));
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

#[test]
fn telemetry_summary_counts_domain_events() {
    let lines = vec![
        json!({"ts_unix_ms": 1000, "event": "command.completed", "run_id": "run-1", "command": "enrich"}).to_string(),
        json!({"ts_unix_ms": 2000, "event": "leads.collected", "run_id": "run-1", "command": "enrich", "count": 3}).to_string(),
        json!({"ts_unix_ms": 3000, "event": "member.responded", "run_id": "run-2", "command": "enrich", "member": "summarizer"}).to_string(),
        json!({"ts_unix_ms": 4000, "event": "tool.failed", "run_id": "run-2", "command": "enrich", "tool": "web_search"}).to_string(),
        "not json".to_string(),
    ];

    let summary = summarize_telemetry_lines(lines, 100);
    assert_eq!(summary.total_lines, 5);
    assert_eq!(summary.parsed_events, 4);
    assert_eq!(summary.parse_errors, 1);
    assert_eq!(summary.command_completed, 1);
    assert_eq!(summary.leads_collected, 3);
    assert_eq!(summary.members_responded, 1);
    assert_eq!(summary.tool_failed, 1);
    assert_eq!(summary.unique_runs.len(), 2);
    assert_eq!(summary.last_event_ts_unix_ms, Some(4000));
}

#[test]
fn disabled_telemetry_sink_writes_nothing() {
    let dir = tempdir().expect("temp directory should create");
    let mut cfg = base_cfg();
    cfg.telemetry_enabled = false;
    cfg.telemetry_path = dir
        .path()
        .join("events.jsonl")
        .to_string_lossy()
        .to_string();

    let sink = test_telemetry(&cfg);
    sink.emit("command.completed", json!({}));

    assert!(!dir.path().join("events.jsonl").exists());
}

#[test]
fn enabled_telemetry_sink_appends_jsonl_records() {
    let dir = tempdir().expect("temp directory should create");
    let mut cfg = base_cfg();
    cfg.telemetry_enabled = true;
    cfg.telemetry_path = dir
        .path()
        .join("nested/events.jsonl")
        .to_string_lossy()
        .to_string();

    let sink = test_telemetry(&cfg);
    sink.emit("leads.collected", json!({"count": 2}));
    sink.emit("command.completed", json!({}));

    let content =
        std::fs::read_to_string(dir.path().join("nested/events.jsonl")).expect("file should read");
    let lines = content.lines().collect::<Vec<&str>>();
    assert_eq!(lines.len(), 2);

    let first: Value = serde_json::from_str(lines[0]).expect("line should parse");
    assert_eq!(first["event"], "leads.collected");
    assert_eq!(first["count"], 2);
    assert_eq!(first["command"], "test");
    assert!(first["run_id"].as_str().is_some_and(|id| !id.is_empty()));
}

// ---------------------------------------------------------------------------
// Streaming reconciliation
// ---------------------------------------------------------------------------

#[test]
fn partial_deltas_append_to_member_buffer() {
    let mut buffer = String::new();
    assert_eq!(ingest_member_text(&mut buffer, "Hel", true, false), "Hel");
    assert_eq!(ingest_member_text(&mut buffer, "lo", true, false), "lo");
    assert_eq!(buffer, "Hello");
}

#[test]
fn snapshot_extension_emits_only_the_suffix() {
    let mut buffer = String::new();
    assert_eq!(
        ingest_member_text(&mut buffer, "Hello", false, false),
        "Hello"
    );
    assert_eq!(
        ingest_member_text(&mut buffer, "Hello world", false, false),
        " world"
    );
    assert_eq!(ingest_member_text(&mut buffer, "Hello world", false, false), "");
}

#[test]
fn divergent_final_snapshot_updates_state_without_reprinting() {
    let mut buffer = String::from("streamed text");
    assert_eq!(
        ingest_member_text(&mut buffer, "different final", false, true),
        ""
    );
    assert_eq!(buffer, "different final");
}

#[test]
fn overlap_detection_respects_char_boundaries() {
    assert_eq!(suffix_prefix_overlap("abcdef", "defxyz"), 3);
    assert_eq!(suffix_prefix_overlap("abc", "xyz"), 0);
    assert_eq!(suffix_prefix_overlap("héllo", "llo wörld"), 3);
}

#[test]
fn final_suffix_covers_stream_tail_cases() {
    assert_eq!(final_stream_suffix("", "full text"), Some("full text".to_string()));
    assert_eq!(final_stream_suffix("full text", "full text"), None);
    assert_eq!(
        final_stream_suffix("full", "full text"),
        Some(" text".to_string())
    );
    assert_eq!(
        final_stream_suffix("emitted", "replacement"),
        Some("\nreplacement".to_string())
    );
    assert_eq!(final_stream_suffix("emitted", "   "), None);
}

#[test]
fn tracker_prefers_final_snapshot_over_partial_tail() {
    let mut tracker = MemberTextTracker::default();
    tracker.ingest("company_researcher", "partial findings", true, false);
    tracker.ingest("summarizer", "the report", false, true);

    assert_eq!(tracker.resolve_text(), Some("the report".to_string()));
    assert_eq!(
        tracker.latest_final_member.as_deref(),
        Some("summarizer")
    );
}

#[test]
fn tracker_resolves_none_for_silent_stream() {
    let tracker = MemberTextTracker::default();
    assert_eq!(tracker.resolve_text(), None);
}

#[test]
fn tool_failure_messages_extract_from_payloads() {
    assert_eq!(
        extract_tool_failure_message(&json!({"error": "no results"})),
        Some("no results".to_string())
    );
    assert_eq!(
        extract_tool_failure_message(&json!({"status": "failed", "message": "timeout"})),
        Some("timeout".to_string())
    );
    assert_eq!(
        extract_tool_failure_message(&json!({"status": "ok", "message": "fine"})),
        None
    );
    assert_eq!(extract_tool_failure_message(&json!({"results": []})), None);
}

// ---------------------------------------------------------------------------
// Research tools
// ---------------------------------------------------------------------------

const SEARCH_FIXTURE: &str = r#"
<html><body>
<div class="result">
  <a class="result__a" href="https://example.com/acme">Acme Corp - Official Site</a>
  <a class="result__snippet">Acme Corp builds anvils and rockets.</a>
</div>
<div class="result">
  <a class="result__a" href="https://news.example.com/acme-funding">Acme raises Series B</a>
  <a class="result__snippet">Funding news snippet.</a>
</div>
</body></html>
"#;

#[test]
fn search_results_parse_from_duckduckgo_html() {
    let hits = parse_search_results(SEARCH_FIXTURE, 10);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "Acme Corp - Official Site");
    assert_eq!(hits[0].url, "https://example.com/acme");
    assert_eq!(hits[0].snippet, "Acme Corp builds anvils and rockets.");
}

#[test]
fn search_result_limit_is_honored() {
    let hits = parse_search_results(SEARCH_FIXTURE, 1);
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn web_search_requires_a_query() {
    let payload = web_search_tool_response(&json!({}), 5).await;
    assert!(
        payload["error"]
            .as_str()
            .is_some_and(|msg| msg.contains("query"))
    );

    let payload = web_search_tool_response(&json!({"query": "   "}), 5).await;
    assert!(payload["error"].as_str().is_some());
}

#[tokio::test]
async fn firecrawl_tools_degrade_without_an_api_key() {
    let payload = scrape_tool_response(&json!({"url": "https://acme.example"}), None, 8_000).await;
    assert!(
        payload["error"]
            .as_str()
            .is_some_and(|msg| msg.contains(FIRECRAWL_API_KEY_ENV))
    );

    let payload =
        crawl_tool_response(&json!({"url": "https://acme.example"}), None, 5, 8_000).await;
    assert!(payload["error"].as_str().is_some());
}

#[tokio::test]
async fn firecrawl_scrape_requires_a_url() {
    let payload =
        scrape_tool_response(&json!({}), Some("fc-test".to_string()), 8_000).await;
    assert!(
        payload["error"]
            .as_str()
            .is_some_and(|msg| msg.contains("url"))
    );
}

#[test]
fn content_truncation_is_char_safe() {
    let (text, truncated) = truncate_chars("héllo wörld", 5);
    assert_eq!(text, "héllo");
    assert!(truncated);

    let (text, truncated) = truncate_chars("short", 10);
    assert_eq!(text, "short");
    assert!(!truncated);
}

#[test]
fn company_toolset_carries_search_and_firecrawl() {
    let cfg = base_cfg();
    let tools = build_company_tools(&cfg);
    let names = tools.iter().map(|tool| tool.name()).collect::<Vec<&str>>();
    assert_eq!(
        names,
        [
            WEB_SEARCH_TOOL_NAME,
            FIRECRAWL_SCRAPE_TOOL_NAME,
            FIRECRAWL_CRAWL_TOOL_NAME
        ]
    );
}

// ---------------------------------------------------------------------------
// MCP configuration
// ---------------------------------------------------------------------------

#[test]
fn disabled_mcp_servers_are_filtered_out() {
    let mut cfg = base_cfg();
    cfg.mcp_servers = vec![
        McpServerConfig {
            name: "on".to_string(),
            endpoint: "https://mcp.example/a".to_string(),
            enabled: None,
            timeout_secs: None,
            auth_bearer_env: None,
            tool_allowlist: Vec::new(),
        },
        McpServerConfig {
            name: "off".to_string(),
            endpoint: "https://mcp.example/b".to_string(),
            enabled: Some(false),
            timeout_secs: None,
            auth_bearer_env: None,
            tool_allowlist: Vec::new(),
        },
    ];

    let servers = effective_mcp_servers(&cfg);
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].name, "on");
}

#[test]
fn unknown_mcp_server_selection_fails_as_tooling() {
    let cfg = base_cfg();
    let err =
        select_mcp_servers(&cfg, Some("nope")).expect_err("unknown server should fail");
    assert_eq!(categorize_error(&err), ErrorCategory::Tooling);
}

#[test]
fn mcp_auth_resolution_handles_missing_env() {
    let no_auth = McpServerConfig {
        name: "open".to_string(),
        endpoint: "https://mcp.example".to_string(),
        enabled: None,
        timeout_secs: None,
        auth_bearer_env: None,
        tool_allowlist: Vec::new(),
    };
    assert!(bearer_token(&no_auth).expect("no auth is fine").is_none());

    let with_missing_env = McpServerConfig {
        auth_bearer_env: Some("ENRICH_TEST_DEFINITELY_UNSET_TOKEN".to_string()),
        ..no_auth
    };
    let err = bearer_token(&with_missing_env).expect_err("missing env should fail");
    assert!(err.to_string().contains("ENRICH_TEST_DEFINITELY_UNSET_TOKEN"));
}

// ---------------------------------------------------------------------------
// Team composition
// ---------------------------------------------------------------------------

#[test]
fn roster_lists_the_four_members_in_pipeline_order() {
    let names = roster().map(|member| member.name);
    assert_eq!(
        names,
        [
            "company_researcher",
            "individual_researcher",
            "activity_researcher",
            "summarizer"
        ]
    );
}

#[test]
fn researchers_carry_output_keys_and_summarizer_does_not() {
    for member in roster() {
        if member.name == SUMMARIZER_AGENT_NAME {
            assert_eq!(member.output_key, None);
        } else {
            assert!(
                member
                    .output_key
                    .is_some_and(|key| key.ends_with("_findings"))
            );
        }
    }
}

#[test]
fn member_lookup_finds_known_names_only() {
    assert!(member_profile("company_researcher").is_some());
    assert!(member_profile("unknown").is_none());
}

#[test]
fn report_sections_match_the_required_report_shape() {
    assert_eq!(
        REPORT_SECTIONS,
        [
            "Executive Summary",
            "Company Overview",
            "Individual Profile",
            "Recent Activity & Insights",
            "Key Opportunities & Pain Points",
            "Recommendations"
        ]
    );
}

#[tokio::test]
async fn enrichment_team_runs_to_a_final_report_over_mock_model() {
    let cfg = base_cfg();
    let telemetry = test_telemetry(&cfg);
    let team = build_enrichment_team(
        mock_model("enrichment report"),
        &[],
        &[],
        Duration::from_secs(45),
    )
    .expect("team should build");

    let runner = build_runner(team, "test-session")
        .await
        .expect("runner should build");

    let batch = batch_of(&["John Doe, Acme Corp"]);
    let request = build_enrichment_request(&batch);
    let report = run_team(&runner, "test-session", &request, &telemetry)
        .await
        .expect("team should run");

    assert_eq!(report, "enrichment report");
}

// ---------------------------------------------------------------------------
// CLI surface
// ---------------------------------------------------------------------------

#[test]
fn command_labels_cover_every_subcommand() {
    assert_eq!(command_label(None), "enrich");
    assert_eq!(
        command_label(Some(&Commands::Enrich { leads_file: None })),
        "enrich"
    );
    assert_eq!(command_label(Some(&Commands::Doctor)), "doctor");
    assert_eq!(
        command_label(Some(&Commands::Agents {
            command: AgentCommands::List
        })),
        "agents.list"
    );
    assert_eq!(
        command_label(Some(&Commands::Mcp {
            command: McpCommands::Discover { server: None }
        })),
        "mcp.discover"
    );
    assert_eq!(
        command_label(Some(&Commands::Telemetry {
            command: TelemetryCommands::Report {
                path: None,
                limit: 100
            }
        })),
        "telemetry.report"
    );
}
