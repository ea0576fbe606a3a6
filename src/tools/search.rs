/// DuckDuckGo web search backing for the `web_search` tool.
///
/// Uses the HTML endpoint so no API key is required; queries are passed
/// through verbatim (the agents are instructed to keep them simple).
use anyhow::{Context, Result};
use scraper::{Html, Selector};
use serde_json::{Value, json};

pub const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const SEARCH_USER_AGENT: &str = "Mozilla/5.0 (compatible; enrich-cli)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

pub async fn web_search_tool_response(args: &Value, default_limit: usize) -> Value {
    let Some(query) = args
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
    else {
        return json!({"error": "missing required argument 'query'"});
    };

    let limit = args
        .get("max_results")
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default_limit)
        .clamp(1, 10);

    match run_search(query, limit).await {
        Ok(hits) if hits.is_empty() => json!({
            "query": query,
            "results": [],
            "note": "No results found",
        }),
        Ok(hits) => json!({
            "query": query,
            "results": hits
                .iter()
                .map(|hit| {
                    json!({
                        "title": hit.title,
                        "url": hit.url,
                        "snippet": hit.snippet,
                    })
                })
                .collect::<Vec<Value>>(),
        }),
        Err(err) => json!({
            "query": query,
            "error": format!("search failed: {err:#}"),
        }),
    }
}

async fn run_search(query: &str, limit: usize) -> Result<Vec<SearchHit>> {
    let client = reqwest::Client::builder()
        .user_agent(SEARCH_USER_AGENT)
        .build()
        .context("failed to build search HTTP client")?;

    let body = client
        .get(SEARCH_ENDPOINT)
        .query(&[("q", query)])
        .send()
        .await
        .context("search request failed")?
        .error_for_status()
        .context("search returned an error status")?
        .text()
        .await
        .context("failed to read search response body")?;

    Ok(parse_search_results(&body, limit))
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Extracts result entries from the DuckDuckGo HTML page.
pub fn parse_search_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let (Some(result_sel), Some(title_sel), Some(snippet_sel)) = (
        selector("div.result"),
        selector("a.result__a"),
        selector(".result__snippet"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut hits = Vec::new();

    for result in document.select(&result_sel) {
        let Some(anchor) = result.select(&title_sel).next() else {
            continue;
        };
        let title = anchor.text().collect::<String>().trim().to_string();
        let url = anchor
            .value()
            .attr("href")
            .unwrap_or_default()
            .trim()
            .to_string();
        if title.is_empty() || url.is_empty() {
            continue;
        }
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(|node| node.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(SearchHit {
            title,
            url,
            snippet,
        });
        if hits.len() >= limit {
            break;
        }
    }

    hits
}
