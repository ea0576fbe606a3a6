use std::sync::Arc;

use adk_rust::prelude::*;
use anyhow::Result;

use super::activity::ACTIVITY_OUTPUT_KEY;
use super::company::COMPANY_OUTPUT_KEY;
use super::individual::INDIVIDUAL_OUTPUT_KEY;

pub const SUMMARIZER_AGENT_NAME: &str = "summarizer";

/// Fixed section headers of the final report, in order.
pub const REPORT_SECTIONS: [&str; 6] = [
    "Executive Summary",
    "Company Overview",
    "Individual Profile",
    "Recent Activity & Insights",
    "Key Opportunities & Pain Points",
    "Recommendations",
];

fn instruction() -> String {
    let sections = REPORT_SECTIONS
        .iter()
        .map(|section| format!("- {section}"))
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        "You create the final lead enrichment report from the research gathered \
         by the other team members.\n\
         \n\
         Company findings: {{{COMPANY_OUTPUT_KEY}?}}\n\
         Individual findings: {{{INDIVIDUAL_OUTPUT_KEY}?}}\n\
         Activity findings: {{{ACTIVITY_OUTPUT_KEY}?}}\n\
         \n\
         Synthesize everything into a clear, structured summary that highlights \
         key insights and actionable information. Format the summary with ALL \
         of the following sections:\n\
         {sections}\n\
         \n\
         The Individual Profile section must include email, phone, title, and \
         other details where found. Preserve source attributions from the \
         researchers: when a fact came from LinkedIn, cite it inline, for \
         example \"John Doe is the VP of Engineering at Acme Corp (source: \
         LinkedIn)\". Note explicitly where research was unavailable."
    )
}

pub fn build_summarizer_agent(model: Arc<dyn Llm>) -> Result<Arc<dyn Agent>> {
    let agent = LlmAgentBuilder::new(SUMMARIZER_AGENT_NAME)
        .description("Synthesizes all findings into the structured enrichment report.")
        .instruction(instruction())
        .model(model)
        .build()?;

    Ok(Arc::new(agent))
}
