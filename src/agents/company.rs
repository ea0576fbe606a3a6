use std::sync::Arc;
use std::time::Duration;

use adk_rust::prelude::*;
use anyhow::Result;

use super::{SEARCH_STRATEGY, SOURCE_ATTRIBUTION};

pub const COMPANY_AGENT_NAME: &str = "company_researcher";
pub const COMPANY_OUTPUT_KEY: &str = "company_findings";

fn instruction() -> String {
    format!(
        "You gather company-level information for each lead.\n\
         Tasks:\n\
         1. Find company data: size, industry, location, and similar facts.\n\
         2. Research recent news and announcements, at most 3 articles per company.\n\
         3. Scrape the company website for additional context using the firecrawl tools.\n\
         \n\
         {SOURCE_ATTRIBUTION}\n\
         \n\
         {SEARCH_STRATEGY}\n\
         \n\
         Present the information accurately and concisely, with a section per \
         information type, noting when search results were unavailable."
    )
}

pub fn build_company_agent(
    model: Arc<dyn Llm>,
    tools: &[Arc<dyn Tool>],
    tool_timeout: Duration,
) -> Result<Arc<dyn Agent>> {
    let mut builder = LlmAgentBuilder::new(COMPANY_AGENT_NAME)
        .description("Finds publicly available company-level information, recent news, and website content.")
        .instruction(instruction())
        .model(model)
        .output_key(COMPANY_OUTPUT_KEY)
        .tool_timeout(tool_timeout);

    for tool in tools {
        builder = builder.tool(tool.clone());
    }

    Ok(Arc::new(builder.build()?))
}
