use anyhow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Provider,
    Tooling,
    Input,
    Internal,
}

impl ErrorCategory {
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::Provider => "PROVIDER",
            ErrorCategory::Tooling => "TOOLING",
            ErrorCategory::Input => "INPUT",
            ErrorCategory::Internal => "INTERNAL",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            ErrorCategory::Provider => {
                "Add ANTHROPIC_API_KEY to .env.local (or export it) and rerun."
            }
            ErrorCategory::Tooling => {
                "Review tool/MCP configuration and retry with RUST_LOG=info for detailed tool logs."
            }
            ErrorCategory::Input => "Run enrich-cli --help and correct command arguments.",
            ErrorCategory::Internal => {
                "Retry with RUST_LOG=debug. If it persists, capture logs and open an issue."
            }
        }
    }
}

/// Marker phrases checked against the lowercased error chain, first category
/// with a hit wins.
const CATEGORY_MARKERS: &[(ErrorCategory, &[&str])] = &[
    (
        ErrorCategory::Provider,
        &["anthropic_api_key", "api key", "not an anthropic model"],
    ),
    (
        ErrorCategory::Input,
        &[
            "invalid value",
            "unknown argument",
            "unknown team member",
            "leads file",
            "request exceeds",
            "failed to read input",
            "profile",
        ],
    ),
    (ErrorCategory::Tooling, &["tool", "mcp", "crawl", "search"]),
];

pub fn categorize_error(err: &anyhow::Error) -> ErrorCategory {
    let msg = format!("{err:#}").to_ascii_lowercase();

    CATEGORY_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|marker| msg.contains(marker)))
        .map(|(category, _)| *category)
        .unwrap_or(ErrorCategory::Internal)
}

pub fn format_cli_error(err: &anyhow::Error, show_sensitive_config: bool) -> String {
    let category = categorize_error(err);
    let rendered = render_error_message(err, show_sensitive_config);
    format!("[{}] {}\nHint: {}", category.code(), rendered, category.hint())
}

pub fn render_error_message(err: &anyhow::Error, show_sensitive_config: bool) -> String {
    let rendered = format!("{err:#}");
    if show_sensitive_config {
        rendered
    } else {
        redact_sensitive_text(&rendered)
    }
}

/// Prefixes of credential tokens that must never reach the terminal.
const SECRET_PREFIXES: &[&str] = &["sk-ant-", "fc-"];

pub fn redact_sensitive_text(text: &str) -> String {
    SECRET_PREFIXES
        .iter()
        .fold(text.to_string(), |acc, prefix| {
            redact_tokens_with_prefix(&acc, prefix)
        })
}

fn is_token_end(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            '"' | '\'' | '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';'
        )
}

pub fn redact_tokens_with_prefix(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(offset) = rest.find(prefix) {
        out.push_str(&rest[..offset]);
        out.push_str(prefix);
        out.push_str("[REDACTED]");

        let after_prefix = &rest[offset..];
        let token_len = after_prefix
            .find(is_token_end)
            .unwrap_or(after_prefix.len());
        rest = &after_prefix[token_len..];
    }

    out.push_str(rest);
    out
}
