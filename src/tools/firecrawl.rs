/// Firecrawl scrape/crawl backing for the company website tools.
///
/// Scrape fetches one page as markdown; crawl walks a site up to the
/// configured page limit. A missing FIRECRAWL_API_KEY degrades to a
/// structured error payload so the model can note the tool was unavailable.
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{Value, json};

pub const FIRECRAWL_API_BASE: &str = "https://api.firecrawl.dev/v1";
pub const FIRECRAWL_API_KEY_ENV: &str = "FIRECRAWL_API_KEY";

const CRAWL_POLL_INTERVAL: Duration = Duration::from_secs(2);
const CRAWL_MAX_POLLS: usize = 30;

pub fn missing_key_payload() -> Value {
    json!({
        "error": format!(
            "{FIRECRAWL_API_KEY_ENV} is not set; website scraping is unavailable"
        )
    })
}

/// Truncates to a char boundary, reporting whether anything was dropped.
pub fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text.to_string(), false);
    }
    (text.chars().take(max_chars).collect(), true)
}

pub async fn scrape_tool_response(
    args: &Value,
    api_key: Option<String>,
    content_budget_chars: usize,
) -> Value {
    let Some(url) = args
        .get("url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|u| !u.is_empty())
    else {
        return json!({"error": "missing required argument 'url'"});
    };
    let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
        return missing_key_payload();
    };

    match run_scrape(url, &api_key).await {
        Ok(page) => page_payload(&page, content_budget_chars),
        Err(err) => json!({
            "url": url,
            "error": format!("scrape failed: {err:#}"),
        }),
    }
}

pub async fn crawl_tool_response(
    args: &Value,
    api_key: Option<String>,
    page_limit: u32,
    content_budget_chars: usize,
) -> Value {
    let Some(url) = args
        .get("url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|u| !u.is_empty())
    else {
        return json!({"error": "missing required argument 'url'"});
    };
    let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) else {
        return missing_key_payload();
    };

    let limit = args
        .get("limit")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(page_limit)
        .clamp(1, page_limit.max(1));

    match run_crawl(url, &api_key, limit).await {
        Ok(pages) => {
            let budget_per_page = (content_budget_chars / pages.len().max(1)).max(256);
            json!({
                "url": url,
                "pages": pages
                    .iter()
                    .map(|page| page_payload(page, budget_per_page))
                    .collect::<Vec<Value>>(),
            })
        }
        Err(err) => json!({
            "url": url,
            "error": format!("crawl failed: {err:#}"),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct CrawledPage {
    pub url: String,
    pub title: String,
    pub markdown: String,
}

fn page_payload(page: &CrawledPage, budget_chars: usize) -> Value {
    let (content, truncated) = truncate_chars(&page.markdown, budget_chars);
    let mut payload = json!({
        "url": page.url,
        "title": page.title,
        "markdown": content,
    });
    if truncated
        && let Some(map) = payload.as_object_mut()
    {
        map.insert("truncated".to_string(), json!(true));
    }
    payload
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .context("failed to build Firecrawl HTTP client")
}

fn page_from_data(data: &Value) -> CrawledPage {
    let metadata = data.get("metadata").cloned().unwrap_or_default();
    CrawledPage {
        url: metadata
            .get("sourceURL")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        title: metadata
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        markdown: data
            .get("markdown")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

async fn run_scrape(url: &str, api_key: &str) -> Result<CrawledPage> {
    let client = http_client()?;
    let response: Value = client
        .post(format!("{FIRECRAWL_API_BASE}/scrape"))
        .bearer_auth(api_key)
        .json(&json!({"url": url, "formats": ["markdown"]}))
        .send()
        .await
        .context("scrape request failed")?
        .error_for_status()
        .context("scrape returned an error status")?
        .json()
        .await
        .context("failed to decode scrape response")?;

    let data = response
        .get("data")
        .filter(|_| response.get("success").and_then(Value::as_bool) == Some(true))
        .ok_or_else(|| anyhow::anyhow!("scrape response reported failure"))?;

    let mut page = page_from_data(data);
    if page.url.is_empty() {
        page.url = url.to_string();
    }
    Ok(page)
}

async fn run_crawl(url: &str, api_key: &str, limit: u32) -> Result<Vec<CrawledPage>> {
    let client = http_client()?;
    let started: Value = client
        .post(format!("{FIRECRAWL_API_BASE}/crawl"))
        .bearer_auth(api_key)
        .json(&json!({
            "url": url,
            "limit": limit,
            "scrapeOptions": {"formats": ["markdown"]},
        }))
        .send()
        .await
        .context("crawl request failed")?
        .error_for_status()
        .context("crawl returned an error status")?
        .json()
        .await
        .context("failed to decode crawl response")?;

    let job_id = started
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("crawl response carried no job id"))?
        .to_string();

    for _ in 0..CRAWL_MAX_POLLS {
        tokio::time::sleep(CRAWL_POLL_INTERVAL).await;

        let status: Value = client
            .get(format!("{FIRECRAWL_API_BASE}/crawl/{job_id}"))
            .bearer_auth(api_key)
            .send()
            .await
            .context("crawl status request failed")?
            .error_for_status()
            .context("crawl status returned an error status")?
            .json()
            .await
            .context("failed to decode crawl status")?;

        match status.get("status").and_then(Value::as_str) {
            Some("completed") => {
                let pages = status
                    .get("data")
                    .and_then(Value::as_array)
                    .map(|entries| entries.iter().map(page_from_data).collect())
                    .unwrap_or_default();
                return Ok(pages);
            }
            Some("failed") => {
                return Err(anyhow::anyhow!("crawl job '{job_id}' failed"));
            }
            _ => {}
        }
    }

    Err(anyhow::anyhow!(
        "crawl job '{job_id}' did not complete in time"
    ))
}
