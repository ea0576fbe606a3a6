use std::sync::Arc;
use std::time::Duration;

use adk_rust::prelude::*;
use anyhow::Result;

use super::SEARCH_STRATEGY;

pub const ACTIVITY_AGENT_NAME: &str = "activity_researcher";
pub const ACTIVITY_OUTPUT_KEY: &str = "activity_findings";

fn instruction() -> String {
    format!(
        "You gather recent activity and insights for each lead.\n\
         Tasks:\n\
         1. Find recent posts and articles by or about the individual.\n\
         2. Identify public mentions.\n\
         3. Extract pain points or challenges mentioned publicly.\n\
         4. Analyze sentiment and key themes.\n\
         Use the external data retrieval tools available to you for posts, \
         articles, and mentions.\n\
         \n\
         {SEARCH_STRATEGY}\n\
         Useful variations: \"Person Name\", \"Person Name articles\", \
         \"Person Name mentions\", \"Person Name Company\".\n\
         When specific data is unavailable, provide general insights from \
         industry trends and typical pain points, and say that you did so.\n\
         \n\
         Present the information clearly, with a section per information \
         type, noting when search results were unavailable."
    )
}

pub fn build_activity_agent(
    model: Arc<dyn Llm>,
    tools: &[Arc<dyn Tool>],
    tool_timeout: Duration,
) -> Result<Arc<dyn Agent>> {
    let mut builder = LlmAgentBuilder::new(ACTIVITY_AGENT_NAME)
        .description("Finds recent posts, articles, and mentions; extracts pain points and themes.")
        .instruction(instruction())
        .model(model)
        .output_key(ACTIVITY_OUTPUT_KEY)
        .tool_timeout(tool_timeout);

    for tool in tools {
        builder = builder.tool(tool.clone());
    }

    Ok(Arc::new(builder.build()?))
}
