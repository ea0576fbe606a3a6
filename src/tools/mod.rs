pub mod firecrawl;
pub mod search;

use std::sync::Arc;

use adk_rust::prelude::*;

use crate::config::RuntimeConfig;
use crate::tools::firecrawl::FIRECRAWL_API_KEY_ENV;

pub const WEB_SEARCH_TOOL_NAME: &str = "web_search";
pub const FIRECRAWL_SCRAPE_TOOL_NAME: &str = "firecrawl_scrape";
pub const FIRECRAWL_CRAWL_TOOL_NAME: &str = "firecrawl_crawl";

/// Tools handed to the company researcher: open web search plus website
/// scraping/crawling. The individual and activity researchers use
/// MCP-discovered tools instead (see `crate::mcp`).
pub fn build_company_tools(cfg: &RuntimeConfig) -> Vec<Arc<dyn Tool>> {
    let search_limit = cfg.search_result_limit;
    let content_budget = cfg.content_budget_chars;
    let crawl_limit = cfg.crawl_page_limit;

    let web_search = FunctionTool::new(
        WEB_SEARCH_TOOL_NAME,
        "Searches the public web via DuckDuckGo and returns result titles, URLs, and snippets. \
         Args: query (required), max_results.",
        move |_ctx, args| async move {
            Ok(search::web_search_tool_response(&args, search_limit).await)
        },
    );

    let firecrawl_scrape = FunctionTool::new(
        FIRECRAWL_SCRAPE_TOOL_NAME,
        "Fetches a single web page as markdown through Firecrawl. \
         Args: url (required).",
        move |_ctx, args| async move {
            let api_key = std::env::var(FIRECRAWL_API_KEY_ENV).ok();
            Ok(firecrawl::scrape_tool_response(&args, api_key, content_budget).await)
        },
    );

    let firecrawl_crawl = FunctionTool::new(
        FIRECRAWL_CRAWL_TOOL_NAME,
        "Crawls a website through Firecrawl and returns markdown for the pages it visited. \
         Args: url (required), limit (pages, bounded by configuration).",
        move |_ctx, args| async move {
            let api_key = std::env::var(FIRECRAWL_API_KEY_ENV).ok();
            Ok(firecrawl::crawl_tool_response(&args, api_key, crawl_limit, content_budget).await)
        },
    );

    vec![
        Arc::new(web_search),
        Arc::new(firecrawl_scrape),
        Arc::new(firecrawl_crawl),
    ]
}
