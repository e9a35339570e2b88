// ABOUTME: Integration tests for the web search client against a local stand-in server
// ABOUTME: HTML result parsing, JSON API fallback, result formatting and failure strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, response::Html, routing::get, Json, Router};
use healthlife_server::gateway::HealthDataGateway;
use healthlife_server::tools::implementations::web_search::{
    format_results, parse_api_results, parse_html_results, SearchResult, WebSearchClient,
    WebSearchConfig, NO_RESULTS_MESSAGE,
};
use healthlife_server::tools::{ToolContext, ToolRegistry};
use serde_json::json;
use tokio::net::TcpListener;

use common::{init_test_logging, test_cache};

const HTML_PAGE: &str = r#"
<div class="result">
  <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fnutrition.example%2Foats&amp;rut=abc">Oats &amp; <b>Fiber</b></a>
</div>
<div class="result">
  <a rel="nofollow" class="result__a" href="https://health.example/sleep">Sleep hygiene</a>
</div>
"#;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn client_for(base: &str) -> Arc<WebSearchClient> {
    init_test_logging();
    Arc::new(
        WebSearchClient::new(WebSearchConfig {
            html_endpoint: format!("{base}/html/"),
            api_endpoint: format!("{base}/api/"),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        })
        .expect("client"),
    )
}

fn registry_with(client: Arc<WebSearchClient>) -> ToolRegistry {
    ToolRegistry::new(
        ToolContext::new(HealthDataGateway::in_memory(), test_cache()).with_web_search(client),
    )
}

#[test]
fn test_html_results_are_parsed_and_capped() {
    let results = parse_html_results(HTML_PAGE, 5);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Oats & Fiber");
    assert_eq!(results[0].url, "https://nutrition.example/oats");
    assert_eq!(results[1].url, "https://health.example/sleep");

    assert_eq!(parse_html_results(HTML_PAGE, 1).len(), 1);
}

#[test]
fn test_api_results_put_abstract_first() {
    let body = json!({
        "Abstract": "Oats are a cereal grain.",
        "AbstractSource": "Wikipedia",
        "AbstractURL": "https://en.wikipedia.org/wiki/Oat",
        "RelatedTopics": [
            {"Text": "Oatmeal", "FirstURL": "https://duckduckgo.com/Oatmeal"},
            {"Text": "Bran"},
            {"Name": "category without text"}
        ]
    });

    let results = parse_api_results(&body, 5);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].title, "Wikipedia");
    assert_eq!(results[0].snippet, "Oats are a cereal grain.");
    assert_eq!(results[1].title, "相关主题");
    assert_eq!(results[2].title, "DuckDuckGo");
    assert_eq!(results[2].url, "");
}

#[test]
fn test_format_numbers_entries() {
    assert_eq!(format_results(&[]), NO_RESULTS_MESSAGE);

    let formatted = format_results(&[SearchResult {
        title: "Oats".to_owned(),
        url: "https://a.example".to_owned(),
        snippet: "Whole grain".to_owned(),
    }]);
    assert_eq!(
        formatted,
        "找到 1 条搜索结果:\n\n1. **Oats**\n   Whole grain\n   来源: https://a.example\n\n"
    );
}

#[tokio::test]
async fn test_search_reads_html_endpoint() {
    let base = serve(Router::new().route("/html/", get(|| async { Html(HTML_PAGE) }))).await;
    let registry = registry_with(client_for(&base));

    let result = registry
        .dispatch("webSearch", r#"{"query": "oats fiber", "maxResults": 1}"#)
        .await;

    assert!(result.starts_with("找到 1 条搜索结果:"), "{result}");
    assert!(result.contains("**Oats & Fiber**"));
    assert!(result.contains("来源: https://nutrition.example/oats"));
}

#[tokio::test]
async fn test_refused_html_falls_back_to_api() {
    let router = Router::new()
        .route("/html/", get(|| async { StatusCode::FORBIDDEN }))
        .route(
            "/api/",
            get(|| async {
                Json(json!({
                    "Abstract": "",
                    "RelatedTopics": [{"Text": "Melatonin", "FirstURL": "https://x.example/m"}]
                }))
            }),
        );
    let base = serve(router).await;
    let registry = registry_with(client_for(&base));

    let result = registry.dispatch("webSearch", r#"{"query": "melatonin"}"#).await;

    assert!(result.starts_with("找到 1 条搜索结果:"), "{result}");
    assert!(result.contains("Melatonin"));
}

#[tokio::test]
async fn test_failing_fallback_is_reported() {
    let router = Router::new()
        .route("/html/", get(|| async { StatusCode::FORBIDDEN }))
        .route("/api/", get(|| async { StatusCode::BAD_GATEWAY }));
    let base = serve(router).await;
    let registry = registry_with(client_for(&base));

    let result = registry.dispatch("webSearch", r#"{"query": "anything"}"#).await;

    assert!(result.starts_with("网络搜索失败: "), "{result}");
    assert!(result.contains("502"));
}
