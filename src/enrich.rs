use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use crate::agents::{self, team};
use crate::config::RuntimeConfig;
use crate::leads;
use crate::mcp;
use crate::provider::resolve_model;
use crate::runner::build_runner;
use crate::streaming;
use crate::telemetry::{TelemetrySink, unix_ms_now};
use crate::theme;
use crate::tools;

/// The enrichment flow: credential check, lead collection, team assembly,
/// one streamed team run, completion banner.
pub async fn run_enrich(
    cfg: &RuntimeConfig,
    leads_file: Option<&str>,
    telemetry: &TelemetrySink,
) -> Result<()> {
    // Resolving the model first means a missing ANTHROPIC_API_KEY fails
    // before any prompt is shown or service contacted.
    let (model, model_name) = resolve_model(cfg)?;
    telemetry.emit("model.resolved", json!({"model": model_name}));

    theme::print_startup_banner(&model_name);

    let batch = match leads_file {
        Some(path) => leads::read_leads_from_file(path)?,
        None => {
            leads::print_lead_entry_help();
            leads::prompt_for_leads()?
        }
    };
    let Some(batch) = batch else {
        println!();
        println!("No leads provided. Exiting.");
        return Ok(());
    };
    telemetry.emit("leads.collected", json!({"count": batch.len()}));

    let request = team::build_enrichment_request(&batch);
    team::ensure_request_size(&request, cfg.max_request_chars)?;

    println!();
    println!("{}", theme::section_rule());
    println!("Initializing lead enrichment team...");

    let tool_timeout = Duration::from_secs(cfg.tool_timeout_secs);
    let company_tools = tools::build_company_tools(cfg);
    let retrieval_tools = mcp::discover_mcp_tools(cfg).await;
    if retrieval_tools.is_empty() {
        tracing::warn!(
            "no MCP data retrieval tools available; individual/activity research will note unavailable sources"
        );
    }

    let team_agent =
        team::build_enrichment_team(model, &company_tools, &retrieval_tools, tool_timeout)?;
    let session_id = format!("enrich-{}", unix_ms_now());
    let runner = build_runner(team_agent, &session_id).await?;

    println!("Processing {} lead(s)...", batch.len());
    println!("{}", theme::section_rule());
    println!();

    let report = if cfg.stream {
        streaming::run_team_streaming(
            &runner,
            &session_id,
            &request,
            cfg.show_member_responses,
            telemetry,
        )
        .await?
    } else {
        let report = streaming::run_team(&runner, &session_id, &request, telemetry).await?;
        println!("{report}");
        report
    };
    tracing::debug!(chars = report.len(), "enrichment report complete");

    theme::print_completion_banner();
    Ok(())
}

pub fn run_agents_list() {
    println!("Enrichment team members:");
    for member in agents::roster() {
        let output_key = member.output_key.unwrap_or("<final response>");
        println!("- {} (output: {})", member.name, output_key);
        println!("  {}", member.role);
    }
}

pub fn run_agents_show(name: &str) -> Result<()> {
    let Some(member) = agents::member_profile(name.trim()) else {
        let names = agents::roster()
            .iter()
            .map(|member| member.name)
            .collect::<Vec<&str>>()
            .join(", ");
        return Err(anyhow::anyhow!(
            "unknown team member '{}'. Available members: {}",
            name.trim(),
            names
        ));
    };

    println!("Member: {}", member.name);
    println!("Role: {}", member.role);
    println!(
        "Output key: {}",
        member.output_key.unwrap_or("<final response>")
    );
    println!("Tools: {}", member.tools);
    Ok(())
}
