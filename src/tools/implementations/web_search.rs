// ABOUTME: webSearch tool backed by DuckDuckGo HTML results with an instant-answer fallback
// ABOUTME: Never cached; every failure becomes a localized status string
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Web Search
//!
//! The HTML endpoint is scraped first. When it answers with a non-success status the
//! instant-answer JSON API is queried instead. Results are rendered as numbered
//! blocks the model can cite.

use std::fmt::Write as _;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::errors::{AppError, AppResult};
use crate::tools::context::ToolContext;
use crate::tools::requests::WebSearchRequest;

/// Primary HTML search endpoint
pub const HTML_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
/// Instant-answer JSON endpoint used as fallback
pub const API_SEARCH_URL: &str = "https://api.duckduckgo.com/";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REDIRECT_PREFIX: &str = "//duckduckgo.com/l/?uddg=";
const SERVICE: &str = "duckduckgo";
const DEFAULT_MAX_RESULTS: u32 = 5;
const MAX_RESULTS_CAP: u32 = 10;

/// Shown when the tool is switched off
pub const DISABLED_MESSAGE: &str = "网络搜索功能当前未启用";
/// Shown when nothing was found
pub const NO_RESULTS_MESSAGE: &str = "未找到相关搜索结果";

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Page title
    pub title: String,
    /// Target URL
    pub url: String,
    /// Short excerpt
    pub snippet: String,
}

/// Endpoints and timeouts for [`WebSearchClient`]
#[derive(Debug, Clone)]
pub struct WebSearchConfig {
    /// HTML results endpoint
    pub html_endpoint: String,
    /// JSON fallback endpoint
    pub api_endpoint: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole request timeout
    pub request_timeout: Duration,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            html_endpoint: HTML_SEARCH_URL.to_owned(),
            api_endpoint: API_SEARCH_URL.to_owned(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the search endpoints
#[derive(Debug)]
pub struct WebSearchClient {
    client: Client,
    config: WebSearchConfig,
}

impl WebSearchClient {
    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: WebSearchConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Search, falling back to the JSON API when the HTML endpoint refuses
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or a failing fallback
    #[instrument(skip(self), fields(service = SERVICE))]
    pub async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<SearchResult>> {
        let url = format!("{}?q={}", self.config.html_endpoint, urlencoding::encode(query));
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "HTML search refused, using instant-answer API");
            return self.search_api(query, max_results).await;
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;
        let results = parse_html_results(&html, max_results);
        debug!(count = results.len(), "Parsed HTML search results");
        Ok(results)
    }

    async fn search_api(&self, query: &str, max_results: usize) -> AppResult<Vec<SearchResult>> {
        let url = format!(
            "{}?q={}&format=json&no_html=1&skip_disambig=1",
            self.config.api_endpoint,
            urlencoding::encode(query)
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(
                SERVICE,
                format!("DuckDuckGo API 请求失败: {}", status.as_u16()),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;
        Ok(parse_api_results(&body, max_results))
    }
}

fn tag_pattern() -> Option<&'static Regex> {
    static TAG_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").ok()).as_ref()
}

/// Strip tags and decode entities
#[must_use]
pub fn clean_html(fragment: &str) -> String {
    let text = tag_pattern().map_or_else(
        || fragment.to_owned(),
        |re| re.replace_all(fragment, "").into_owned(),
    );
    let text = text.replace("&nbsp;", " ");
    html_escape::decode_html_entities(&text).trim().to_owned()
}

fn decode_redirect(url: &str) -> String {
    let Some(encoded) = url.strip_prefix(REDIRECT_PREFIX) else {
        return url.to_owned();
    };
    let encoded = encoded.split('&').next().unwrap_or(encoded);
    urlencoding::decode(encoded).map_or_else(|_| encoded.to_owned(), |decoded| decoded.into_owned())
}

/// Extract up to `max_results` hits from the HTML results page
#[must_use]
pub fn parse_html_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    html.split("result__a")
        .skip(1)
        .take(max_results)
        .filter_map(|block| {
            let title_start = block.find('>')? + 1;
            let title_end = block.find("</a>")?;
            if title_end <= title_start {
                return None;
            }
            let url_start = block.find("href=\"")? + "href=\"".len();
            let url_len = block[url_start..].find('"')?;
            if url_len == 0 {
                return None;
            }
            Some(SearchResult {
                title: clean_html(&block[title_start..title_end]),
                url: decode_redirect(&block[url_start..url_start + url_len]),
                snippet: "搜索结果摘要".to_owned(),
            })
        })
        .collect()
}

fn non_empty<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Abstract plus related topics from the instant-answer payload
#[must_use]
pub fn parse_api_results(body: &Value, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    if let Some(abstract_text) = non_empty(body, "Abstract") {
        results.push(SearchResult {
            title: non_empty(body, "AbstractSource").unwrap_or("DuckDuckGo").to_owned(),
            url: non_empty(body, "AbstractURL").unwrap_or_default().to_owned(),
            snippet: abstract_text.to_owned(),
        });
    }

    let remaining = max_results.saturating_sub(results.len());
    if let Some(topics) = body.get("RelatedTopics").and_then(Value::as_array) {
        results.extend(topics.iter().take(remaining).filter_map(|topic| {
            let text = topic.get("Text").and_then(Value::as_str)?;
            let url = topic.get("FirstURL").and_then(Value::as_str);
            Some(SearchResult {
                title: if url.is_some() { "相关主题" } else { "DuckDuckGo" }.to_owned(),
                url: url.unwrap_or_default().to_owned(),
                snippet: text.to_owned(),
            })
        }));
    }

    results.truncate(max_results);
    results
}

/// Numbered result blocks, or the no-results message
#[must_use]
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_owned();
    }
    let mut output = format!("找到 {} 条搜索结果:\n\n", results.len());
    for (index, result) in results.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = write!(
            output,
            "{}. **{}**\n   {}\n   来源: {}\n\n",
            index + 1,
            result.title,
            result.snippet,
            result.url
        );
    }
    output
}

/// `webSearch`
pub async fn web_search(ctx: &ToolContext, request: WebSearchRequest) -> String {
    let Some(client) = ctx.web_search.as_ref() else {
        return DISABLED_MESSAGE.to_owned();
    };
    let max_results = request
        .max_results
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .min(MAX_RESULTS_CAP) as usize;

    match client.search(&request.query, max_results).await {
        Ok(results) => format_results(&results),
        Err(e) => {
            error!(query = %request.query, "网络搜索失败: {}", e);
            format!("网络搜索失败: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_html_strips_tags_and_entities() {
        assert_eq!(clean_html("<b>Oats</b>&nbsp;&amp;&nbsp;&quot;fiber&quot; "), "Oats & \"fiber\"");
    }

    #[test]
    fn test_redirect_is_decoded() {
        assert_eq!(
            decode_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fa&amp;rut=x"),
            "https://example.com/a"
        );
        assert_eq!(decode_redirect("https://plain.example"), "https://plain.example");
    }
}
