use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use enrich_cli::cli::{AgentCommands, Cli, Commands, McpCommands, TelemetryCommands, command_label};
use enrich_cli::config::{RuntimeConfig, load_env_file, load_profiles, resolve_runtime_config};
use enrich_cli::doctor::run_doctor;
use enrich_cli::enrich::{run_agents_list, run_agents_show, run_enrich};
use enrich_cli::error::{format_cli_error, redact_sensitive_text};
use enrich_cli::mcp::{run_mcp_discover, run_mcp_list};
use enrich_cli::telemetry::{TelemetrySink, run_telemetry_report};

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(cli: &Cli, cfg: &RuntimeConfig, telemetry: &TelemetrySink) -> Result<()> {
    match &cli.command {
        None => run_enrich(cfg, None, telemetry).await,
        Some(Commands::Enrich { leads_file }) => {
            run_enrich(cfg, leads_file.as_deref(), telemetry).await
        }
        Some(Commands::Doctor) => run_doctor(cfg),
        Some(Commands::Agents { command }) => match command {
            AgentCommands::List => {
                run_agents_list();
                Ok(())
            }
            AgentCommands::Show { name } => run_agents_show(name),
        },
        Some(Commands::Mcp { command }) => match command {
            McpCommands::List => run_mcp_list(cfg).await,
            McpCommands::Discover { server } => run_mcp_discover(cfg, server.clone()).await,
        },
        Some(Commands::Telemetry { command }) => match command {
            TelemetryCommands::Report { path, limit } => {
                run_telemetry_report(cfg, path.clone(), *limit)
            }
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_filter);
    load_env_file(&cli.env_file);

    let cfg = match load_profiles(&cli.config_path)
        .and_then(|profiles| resolve_runtime_config(&cli, &profiles))
    {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{}", format_cli_error(&err, cli.show_sensitive_config));
            std::process::exit(1);
        }
    };

    let telemetry = TelemetrySink::new(&cfg, command_label(cli.command.as_ref()));

    match dispatch(&cli, &cfg, &telemetry).await {
        Ok(()) => {
            telemetry.emit("command.completed", json!({}));
        }
        Err(err) => {
            telemetry.emit(
                "command.failed",
                json!({"error": redact_sensitive_text(&format!("{err:#}"))}),
            );
            eprintln!("{}", format_cli_error(&err, cfg.show_sensitive_config));
            std::process::exit(1);
        }
    }
}
