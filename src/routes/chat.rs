// ABOUTME: Chat route handlers: streamed answers, plain-text answers, and conversation reset
// ABOUTME: Every handler authenticates the caller from the request token first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! Chat routes
//!
//! `POST /chat/stream` writes pre-framed server-sent events straight into the
//! response body so the wire format stays byte-exact. Missing or invalid tokens
//! are rejected with a 401 JSON error before the model is contacted.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderMap,
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tracing::{info, instrument};

use crate::constants::chat::{EVENT_STREAM_CONTENT_TYPE, MEMORY_CLEARED};
use crate::constants::endpoints::{CHAT, CHAT_MEMORY, CHAT_STREAM};
use crate::errors::AppError;
use crate::resources::ServerResources;

const PLAIN_TEXT_CONTENT_TYPE: &str = "text/html;charset=UTF-8";

/// Body of `POST /chat/stream`
#[derive(Debug, Default, Deserialize)]
pub struct ChatStreamRequest {
    /// The user's message
    #[serde(default)]
    pub query: Option<String>,
}

/// Query of `GET /chat`
#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    /// The user's message
    #[serde(default)]
    pub msg: String,
}

/// `{code, msg, data}` envelope used by the account-facing endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResult<T> {
    /// 1 on success, 0 on failure
    pub code: i32,
    /// Status text
    pub msg: String,
    /// Payload
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    /// Success envelope around `data`
    pub fn success(data: T) -> Self {
        Self {
            code: 1,
            msg: "success".to_owned(),
            data: Some(data),
        }
    }
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(CHAT, get(Self::chat_plain))
            .route(CHAT_STREAM, post(Self::chat_stream))
            .route(CHAT_MEMORY, delete(Self::clear_memory))
            .with_state(resources)
    }

    /// Stream the answer as `data:` events ending with `event: close`
    #[instrument(skip_all)]
    async fn chat_stream(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Option<Json<ChatStreamRequest>>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticator.authenticate(&headers)?;
        let query = body.and_then(|Json(request)| request.query).unwrap_or_default();

        let events = resources
            .pipeline
            .stream(user.user_id, query)
            .map(Ok::<_, Infallible>);

        Ok((
            [
                (CONTENT_TYPE, EVENT_STREAM_CONTENT_TYPE),
                (CACHE_CONTROL, "no-cache"),
            ],
            Body::from_stream(events),
        )
            .into_response())
    }

    /// Stream the answer as unframed text
    #[instrument(skip_all)]
    async fn chat_plain(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ChatQuery>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticator.authenticate(&headers)?;
        let text = resources
            .pipeline
            .raw_stream(user.user_id, query.msg)
            .map(Ok::<_, Infallible>);

        Ok(([(CONTENT_TYPE, PLAIN_TEXT_CONTENT_TYPE)], Body::from_stream(text)).into_response())
    }

    /// Forget the caller's conversation
    #[instrument(skip_all)]
    async fn clear_memory(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Json<ApiResult<&'static str>>, AppError> {
        let user = resources.authenticator.authenticate(&headers)?;
        let existed = resources.sessions.clear(&user.user_id);
        info!(user_id = %user.user_id, existed, "Conversation memory cleared");
        Ok(Json(ApiResult::success(MEMORY_CLEARED)))
    }
}
