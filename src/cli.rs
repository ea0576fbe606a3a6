use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
pub enum AgentCommands {
    #[command(about = "List the built-in enrichment team roster")]
    List,
    #[command(about = "Show a team member's role, instructions summary, and tools")]
    Show {
        #[arg(long)]
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum McpCommands {
    #[command(about = "List MCP servers configured for the active profile")]
    List,
    #[command(about = "Discover MCP tools from configured servers (or a specific server)")]
    Discover {
        #[arg(long)]
        server: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum TelemetryCommands {
    #[command(about = "Summarize telemetry events from a JSONL stream")]
    Report {
        #[arg(long)]
        path: Option<String>,
        #[arg(long, default_value_t = 5000)]
        limit: usize,
    },
}

const CLI_EXAMPLES: &str = "Examples:\n\
  enrich-cli enrich\n\
  enrich-cli --model claude-sonnet-4-20250514 enrich\n\
  enrich-cli enrich --leads-file leads.txt\n\
  enrich-cli --no-stream enrich\n\
  enrich-cli doctor\n\
  enrich-cli agents list\n\
  enrich-cli agents show --name company_researcher\n\
  enrich-cli mcp list\n\
  enrich-cli mcp discover --server brightdata\n\
  enrich-cli telemetry report --limit 2000\n\
\n\
Lead entry:\n\
  - One lead per line, e.g. \"John Doe, Acme Corp\".\n\
  - Type 'done' (or submit a blank line after at least one lead) to start enrichment.\n\
  - Credentials load from .env.local by default; override with --env-file.";

#[derive(Debug, Parser)]
#[command(name = "enrich-cli")]
#[command(about = "Lead-enrichment agent team for your terminal, built on ADK-Rust")]
#[command(after_long_help = CLI_EXAMPLES)]
pub struct Cli {
    #[arg(long, env = "ENRICH_MODEL")]
    pub model: Option<String>,

    #[arg(long, env = "ENRICH_PROFILE", default_value = "default")]
    pub profile: String,

    #[arg(long, env = "ENRICH_CONFIG", default_value = ".enrich/config.toml")]
    pub config_path: String,

    #[arg(long, env = "ENRICH_ENV_FILE", default_value = ".env.local")]
    pub env_file: String,

    #[arg(long, env = "ENRICH_NO_STREAM", default_value_t = false)]
    pub no_stream: bool,

    #[arg(long, env = "ENRICH_SHOW_MEMBER_RESPONSES", action = clap::ArgAction::Set)]
    pub show_member_responses: Option<bool>,

    #[arg(long, env = "ENRICH_SHOW_SENSITIVE_CONFIG", default_value_t = false)]
    pub show_sensitive_config: bool,

    #[arg(long, env = "ENRICH_TOOL_TIMEOUT_SECS")]
    pub tool_timeout_secs: Option<u64>,

    #[arg(long, env = "ENRICH_TOOL_RETRY_ATTEMPTS")]
    pub tool_retry_attempts: Option<u32>,

    #[arg(long, env = "ENRICH_TOOL_RETRY_DELAY_MS")]
    pub tool_retry_delay_ms: Option<u64>,

    #[arg(long, env = "ENRICH_CRAWL_PAGE_LIMIT")]
    pub crawl_page_limit: Option<u32>,

    #[arg(long, env = "ENRICH_SEARCH_RESULT_LIMIT")]
    pub search_result_limit: Option<usize>,

    #[arg(long, env = "ENRICH_TELEMETRY_ENABLED", action = clap::ArgAction::Set)]
    pub telemetry_enabled: Option<bool>,

    #[arg(long, env = "ENRICH_TELEMETRY_PATH")]
    pub telemetry_path: Option<String>,

    #[arg(long, env = "RUST_LOG", default_value = "error")]
    pub log_filter: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Collect leads and run the enrichment team (default)")]
    Enrich {
        #[arg(long)]
        leads_file: Option<String>,
    },
    #[command(about = "Validate credential environment and resolved configuration")]
    Doctor,
    #[command(about = "Inspect the enrichment team roster")]
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },
    #[command(about = "Manage MCP toolset registration and discovery")]
    Mcp {
        #[command(subcommand)]
        command: McpCommands,
    },
    #[command(about = "Telemetry utilities and reporting")]
    Telemetry {
        #[command(subcommand)]
        command: TelemetryCommands,
    },
}

pub fn command_label(command: Option<&Commands>) -> String {
    match command {
        None => "enrich".to_string(),
        Some(Commands::Enrich { .. }) => "enrich".to_string(),
        Some(Commands::Doctor) => "doctor".to_string(),
        Some(Commands::Agents { command }) => match command {
            AgentCommands::List => "agents.list".to_string(),
            AgentCommands::Show { .. } => "agents.show".to_string(),
        },
        Some(Commands::Mcp { command }) => match command {
            McpCommands::List => "mcp.list".to_string(),
            McpCommands::Discover { .. } => "mcp.discover".to_string(),
        },
        Some(Commands::Telemetry { command }) => match command {
            TelemetryCommands::Report { .. } => "telemetry.report".to_string(),
        },
    }
}
