use std::sync::Arc;
use std::time::Duration;

use adk_rust::prelude::*;
use anyhow::Result;

use super::{SEARCH_STRATEGY, SOURCE_ATTRIBUTION};

pub const INDIVIDUAL_AGENT_NAME: &str = "individual_researcher";
pub const INDIVIDUAL_OUTPUT_KEY: &str = "individual_findings";

fn instruction() -> String {
    format!(
        "You gather individual-level information for each lead.\n\
         Tasks:\n\
         1. Find email addresses.\n\
         2. Find phone numbers.\n\
         3. Identify job titles and roles.\n\
         4. Pull profile details from public sources and LinkedIn using the \
         external data retrieval tools available to you.\n\
         \n\
         {SOURCE_ATTRIBUTION}\n\
         \n\
         {SEARCH_STRATEGY}\n\
         Useful variations: \"Person Name\", \"Person Name Company\", \
         \"Person Name email\", \"Person Name phone\".\n\
         \n\
         Present the information accurately and concisely, with a section per \
         information type, noting when search results were unavailable."
    )
}

pub fn build_individual_agent(
    model: Arc<dyn Llm>,
    tools: &[Arc<dyn Tool>],
    tool_timeout: Duration,
) -> Result<Arc<dyn Agent>> {
    let mut builder = LlmAgentBuilder::new(INDIVIDUAL_AGENT_NAME)
        .description("Finds individual contact details, titles, and profile data from public sources.")
        .instruction(instruction())
        .model(model)
        .output_key(INDIVIDUAL_OUTPUT_KEY)
        .tool_timeout(tool_timeout);

    for tool in tools {
        builder = builder.tool(tool.clone());
    }

    Ok(Arc::new(builder.build()?))
}
