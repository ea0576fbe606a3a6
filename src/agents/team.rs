use std::sync::Arc;
use std::time::Duration;

use adk_rust::prelude::*;
use anyhow::Result;

use crate::leads::LeadBatch;

use super::{activity, company, individual, summarizer};

pub const TEAM_NAME: &str = "lead_enrichment_team";
pub const RESEARCH_FANOUT_NAME: &str = "research_fanout";

/// Assembles the team: the three researchers run as a parallel fan-out, and
/// their keyed findings feed the summarizer, which produces the final
/// response. Scheduling and state hand-off happen inside ADK.
pub fn build_enrichment_team(
    model: Arc<dyn Llm>,
    company_tools: &[Arc<dyn Tool>],
    retrieval_tools: &[Arc<dyn Tool>],
    tool_timeout: Duration,
) -> Result<Arc<dyn Agent>> {
    let company = company::build_company_agent(model.clone(), company_tools, tool_timeout)?;
    let individual =
        individual::build_individual_agent(model.clone(), retrieval_tools, tool_timeout)?;
    let activity = activity::build_activity_agent(model.clone(), retrieval_tools, tool_timeout)?;

    let research = Arc::new(ParallelAgent::new(
        RESEARCH_FANOUT_NAME,
        vec![
            company as Arc<dyn Agent>,
            individual as Arc<dyn Agent>,
            activity as Arc<dyn Agent>,
        ],
    ));

    let summarizer = summarizer::build_summarizer_agent(model)?;

    let team = SequentialAgent::new(
        TEAM_NAME,
        vec![research as Arc<dyn Agent>, summarizer as Arc<dyn Agent>],
    );

    Ok(Arc::new(team))
}

/// Builds the request submitted to the team. The collected lead lines are
/// embedded exactly as entered, as a `- ` bullet block.
pub fn build_enrichment_request(leads: &LeadBatch) -> String {
    format!(
        "Please enrich the following leads with comprehensive information:\n\
         \n\
         {}\n\
         \n\
         For each lead:\n\
         1. Gather company-level information.\n\
         2. Gather individual-level information.\n\
         3. Gather recent activity and pain points.\n\
         4. Create a comprehensive summary of all findings.\n\
         \n\
         Present the final summary in a clear, structured format.",
        leads.bullet_block()
    )
}

pub fn ensure_request_size(request: &str, max_chars: usize) -> Result<()> {
    let chars = request.chars().count();
    if chars > max_chars {
        return Err(anyhow::anyhow!(
            "request exceeds the {max_chars}-character limit ({chars} chars). \
             Enrich fewer leads per run."
        ));
    }
    Ok(())
}
