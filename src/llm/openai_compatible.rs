// ABOUTME: OpenAI-compatible chat completions provider with streamed function calling
// ABOUTME: Targets DashScope compatible mode by default, works with any compatible endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # `OpenAI`-Compatible Provider
//!
//! Streams `chat/completions` responses and surfaces both text deltas and
//! tool-call fragments. Upstream failures keep the HTTP status line in their
//! message (`503 Service Unavailable`, `429 Too Many Requests`) so the chat
//! pipeline can classify them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use super::sse_parser::create_sse_stream;
use super::{
    ChatMessage, ChatRequest, ChatStream, LlmCapabilities, LlmProvider, StreamChunk,
    ToolCallDelta, ToolDefinition,
};
use crate::errors::{AppError, ErrorCode};

/// DashScope OpenAI-compatible endpoint
pub const DASHSCOPE_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "qwen-plus";

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 60;

const PROVIDER_NAME: &str = "dashscope";

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: OpenAiFunction,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAiFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OpenAiToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: &'static str,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Clone, Serialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: msg.content.clone(),
            tool_calls: msg
                .tool_calls
                .iter()
                .map(|call| OpenAiToolCall {
                    id: call.id.clone(),
                    call_type: "function",
                    function: OpenAiFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect(),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAiStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiStreamChoice {
    #[serde(default)]
    delta: OpenAiDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAiDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OpenAiToolCallFragment>,
}

#[derive(Debug, Deserialize)]
struct OpenAiToolCallFragment {
    #[serde(default)]
    index: u32,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    function: Option<OpenAiFunctionFragment>,
}

#[derive(Debug, Deserialize)]
struct OpenAiFunctionFragment {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Bearer credential
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Connect timeout for the HTTP client
    pub connect_timeout: Duration,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: DASHSCOPE_BASE_URL.to_owned(),
            api_key: None,
            default_model: DEFAULT_MODEL.to_owned(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            capabilities: LlmCapabilities::tool_streaming(),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            PROVIDER_NAME, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    /// Upstream did not answer in time; kept apart from "unavailable" so the
    /// client sees the timeout message
    fn timeout_error(detail: &dyn std::fmt::Display) -> AppError {
        AppError::new(
            ErrorCode::ExternalServiceError,
            format!("{PROVIDER_NAME} request timed out: {detail}"),
        )
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn convert_tools(tools: &[ToolDefinition]) -> Option<Vec<OpenAiTool>> {
        if tools.is_empty() {
            return None;
        }
        Some(
            tools
                .iter()
                .map(|tool| OpenAiTool {
                    tool_type: "function",
                    function: OpenAiFunction {
                        name: tool.name.clone(),
                        description: tool.description.clone(),
                        parameters: tool.parameters.clone(),
                    },
                })
                .collect(),
        )
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref api_key) => request.bearer_auth(api_key),
            None => request,
        }
    }

    /// Map a non-success response to an error whose message starts with the status line
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |parsed| match parsed.error.error_type {
                Some(kind) => format!("{kind} - {}", parsed.error.message),
                None => parsed.error.message,
            },
        );
        let message = format!("{status}: {detail}");

        match status.as_u16() {
            401 | 403 => AppError::new(ErrorCode::ExternalAuthFailed, message),
            429 => AppError::new(ErrorCode::ExternalRateLimited, message),
            502..=504 => AppError::new(ErrorCode::ExternalServiceUnavailable, message),
            _ => AppError::external_service(PROVIDER_NAME, message),
        }
    }

    /// Parse one streamed JSON payload
    fn parse_stream_payload(json: &str) -> Option<Result<StreamChunk, AppError>> {
        let chunk = match serde_json::from_str::<OpenAiStreamChunk>(json) {
            Ok(chunk) => chunk,
            Err(e) => {
                // Usage-only and heartbeat payloads do not match the chunk shape
                debug!("Skipping unparsable stream payload: {}", e);
                return None;
            }
        };
        let choice = chunk.choices.into_iter().next()?;
        let tool_calls = choice
            .delta
            .tool_calls
            .into_iter()
            .map(|fragment| {
                let (name, arguments) = fragment
                    .function
                    .map_or((None, None), |f| (f.name, f.arguments));
                ToolCallDelta {
                    index: fragment.index,
                    id: fragment.id,
                    name,
                    arguments,
                }
            })
            .collect();

        Some(Ok(StreamChunk {
            delta: choice.delta.content.unwrap_or_default(),
            tool_calls,
            is_final: choice.finish_reason.is_some(),
            finish_reason: choice.finish_reason,
        }))
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete_stream(&self, request: &ChatRequest) -> Result<ChatStream, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            stream: true,
            tools: Self::convert_tools(&request.tools),
            tool_choice: (!request.tools.is_empty()).then_some("auto"),
        };

        debug!(
            "Sending streaming chat completion request with {} messages and {} tools",
            openai_request.messages.len(),
            request.tools.len()
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send streaming request to {}: {}", PROVIDER_NAME, e);
                if e.is_timeout() {
                    Self::timeout_error(&e)
                } else if e.is_connect() {
                    AppError::new(
                        ErrorCode::ExternalServiceUnavailable,
                        format!("service unavailable, cannot connect to {}: {e}", self.config.base_url),
                    )
                } else {
                    AppError::external_service(PROVIDER_NAME, format!("Failed to connect: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Upstream model call failed");
            return Err(Self::parse_error_response(status, &body));
        }

        Ok(create_sse_stream(
            response.bytes_stream(),
            Self::parse_stream_payload,
            PROVIDER_NAME,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_error_keeps_status_line() {
        let body = r#"{"error":{"message":"Requests rate limit exceeded","type":"limit_requests"}}"#;
        let err = OpenAiCompatibleProvider::parse_error_response(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(err.code, ErrorCode::ExternalRateLimited);
        assert!(err.message.starts_with("429 Too Many Requests"));
    }

    #[test]
    fn test_unavailable_error_from_plain_body() {
        let err = OpenAiCompatibleProvider::parse_error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "upstream overloaded",
        );
        assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
        assert!(err.message.contains("503 Service Unavailable"));
    }

    #[test]
    fn test_send_timeout_is_reported_as_timeout() {
        let err = OpenAiCompatibleProvider::timeout_error(&"operation timed out");
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
        assert_eq!(
            crate::chat::pipeline::classify_error(&err.to_string()),
            healthlife_core::constants::chat::MSG_TIMEOUT
        );
    }

    #[test]
    fn test_tool_call_fragment_is_parsed() {
        let json = r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"call_1","function":{"name":"queryBodyMetrics","arguments":"{\"userID\""}}]},"finish_reason":null}]}"#;
        let chunk = OpenAiCompatibleProvider::parse_stream_payload(json)
            .and_then(Result::ok)
            .unwrap_or_default();
        assert_eq!(chunk.tool_calls.len(), 1);
        assert_eq!(chunk.tool_calls[0].name.as_deref(), Some("queryBodyMetrics"));
        assert!(!chunk.is_final);
    }

    #[test]
    fn test_usage_only_payload_is_skipped() {
        let json = r#"{"choices":[],"usage":{"total_tokens":12}}"#;
        assert!(OpenAiCompatibleProvider::parse_stream_payload(json).is_none());
    }
}
