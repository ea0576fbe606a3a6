use std::sync::Arc;

use adk_rust::prelude::*;
use anyhow::Result;

use crate::config::{RuntimeConfig, require_anthropic_api_key};

/// Model every team member runs on unless overridden.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

pub fn validate_model(model_name: &str) -> Result<()> {
    if model_name.starts_with("claude") {
        return Ok(());
    }

    Err(anyhow::anyhow!(
        "model '{}' is not an Anthropic model. Use a claude-* model id.",
        model_name
    ))
}

/// Resolves the shared team model. The credential check runs first so a
/// missing key fails before any leads are collected or services contacted.
pub fn resolve_model(cfg: &RuntimeConfig) -> Result<(Arc<dyn Llm>, String)> {
    let api_key = require_anthropic_api_key()?;
    let model_name = cfg
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    validate_model(&model_name)?;
    let model = AnthropicClient::new(AnthropicConfig::new(api_key, model_name.clone()))?;
    Ok((Arc::new(model), model_name))
}

pub fn env_present(key: &str) -> bool {
    std::env::var(key)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}
