/// The lead-enrichment team.
///
/// Four members, one composition:
/// - `company`: company-level data, news, and website content
/// - `individual`: contact details and role from public sources
/// - `activity`: recent posts, mentions, and pain points
/// - `summarizer`: synthesizes the findings into the final report
///
/// `team` wires the three researchers into a parallel fan-out whose findings
/// feed the summarizer, and owns the enrichment request template.
pub mod activity;
pub mod company;
pub mod individual;
pub mod summarizer;
pub mod team;

/// Shared query discipline for every researcher; hosted search backends drop
/// queries with special characters far more often than they mis-rank plain
/// ones.
pub const SEARCH_STRATEGY: &str = "Search strategy:\n\
- Start with simple, focused queries WITHOUT special characters.\n\
- Replace \"&\" with \"and\"; avoid commas and punctuation inside queries.\n\
- On \"No results found\" or a tool error, retry with an even simpler query \
(often just the bare name), then try variations.\n\
- Break complex queries into separate simpler searches.";

/// Attribution rule the summarizer relies on to cite sources correctly.
pub const SOURCE_ATTRIBUTION: &str = "Source attribution: whenever information \
comes from LinkedIn profiles or company pages, say so inline, for example \
\"Title: VP of Engineering at Acme Corp (source: LinkedIn)\". The summarizer \
uses these notes to attribute the final report.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberProfile {
    pub name: &'static str,
    pub role: &'static str,
    pub output_key: Option<&'static str>,
    pub tools: &'static str,
}

/// Static roster used by `agents list`/`agents show`; the builders in the
/// sibling modules produce the live ADK agents from the same constants.
pub fn roster() -> [MemberProfile; 4] {
    [
        MemberProfile {
            name: company::COMPANY_AGENT_NAME,
            role: "Finds publicly available company-level information, recent news, and website content.",
            output_key: Some(company::COMPANY_OUTPUT_KEY),
            tools: "web_search, firecrawl_scrape, firecrawl_crawl",
        },
        MemberProfile {
            name: individual::INDIVIDUAL_AGENT_NAME,
            role: "Finds individual contact details, titles, and profile data from public sources.",
            output_key: Some(individual::INDIVIDUAL_OUTPUT_KEY),
            tools: "MCP-discovered data retrieval tools",
        },
        MemberProfile {
            name: activity::ACTIVITY_AGENT_NAME,
            role: "Finds recent posts, articles, and mentions; extracts pain points and themes.",
            output_key: Some(activity::ACTIVITY_OUTPUT_KEY),
            tools: "MCP-discovered data retrieval tools",
        },
        MemberProfile {
            name: summarizer::SUMMARIZER_AGENT_NAME,
            role: "Synthesizes all findings into the structured enrichment report.",
            output_key: None,
            tools: "none",
        },
    ]
}

pub fn member_profile(name: &str) -> Option<MemberProfile> {
    roster().into_iter().find(|member| member.name == name)
}
