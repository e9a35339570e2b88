// ABOUTME: Model runtime driving the streaming completion and function-calling loop
// ABOUTME: Forwards text deltas to a channel, dispatches tool calls, and records memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Model Runtime
//!
//! One [`ModelRuntime::run`] call is one conversational turn. The model is asked
//! with the system prompt, the recent turns from the user's memory and the new
//! message. Whenever a round ends with tool calls, each call is dispatched through
//! the [`ToolRegistry`] and the results are fed back for another round, up to
//! [`MAX_TOOL_ROUNDS`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, info, instrument, warn};

use healthlife_core::constants::chat::{DEFAULT_RETRIEVE_SIZE, MAX_TOOL_ROUNDS};

use crate::errors::AppError;
use crate::llm::prompts::build_system_prompt;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, ToolCall, ToolCallDelta};
use crate::sessions::SessionStore;
use crate::tools::ToolRegistry;

/// Sending half the runtime writes text fragments into
pub type FragmentSender = mpsc::Sender<Result<String, AppError>>;

/// Collects streamed tool-call fragments into complete calls
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: BTreeMap<u32, ToolCall>,
}

impl ToolCallAccumulator {
    /// Merge fragments; ids and names replace, arguments concatenate
    pub fn absorb(&mut self, deltas: &[ToolCallDelta]) {
        for delta in deltas {
            let call = self.calls.entry(delta.index).or_insert_with(|| ToolCall {
                id: String::new(),
                name: String::new(),
                arguments: String::new(),
            });
            if let Some(id) = delta.id.as_deref().filter(|id| !id.is_empty()) {
                id.clone_into(&mut call.id);
            }
            if let Some(name) = delta.name.as_deref().filter(|name| !name.is_empty()) {
                name.clone_into(&mut call.name);
            }
            if let Some(arguments) = &delta.arguments {
                call.arguments.push_str(arguments);
            }
        }
    }

    /// Completed calls in index order; fragments that never named a function are dropped
    #[must_use]
    pub fn finish(self) -> Vec<ToolCall> {
        self.calls
            .into_iter()
            .filter(|(_, call)| !call.name.is_empty())
            .map(|(index, mut call)| {
                if call.id.is_empty() {
                    call.id = format!("call_{index}");
                }
                call
            })
            .collect()
    }
}

/// Streaming chat model with the health tool catalogue attached
pub struct ModelRuntime {
    provider: Arc<dyn LlmProvider>,
    tools: ToolRegistry,
    sessions: Arc<dyn SessionStore>,
    model: Option<String>,
    retrieve_size: usize,
}

impl ModelRuntime {
    /// Runtime over `provider` using the provider's default model
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: ToolRegistry,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            provider,
            tools,
            sessions,
            model: None,
            retrieve_size: DEFAULT_RETRIEVE_SIZE,
        }
    }

    /// Override the model id sent upstream
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Number of remembered turns attached to each request
    #[must_use]
    pub const fn with_retrieve_size(mut self, retrieve_size: usize) -> Self {
        self.retrieve_size = retrieve_size;
        self
    }

    /// Session registry backing conversation memory
    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Run one turn for `user_id`, writing fragments into `sink`.
    ///
    /// A failure is delivered as the last item on `sink`. A dropped receiver
    /// ends the turn quietly.
    #[instrument(skip(self, message, sink), fields(provider = self.provider.name()))]
    pub async fn run(&self, user_id: &str, message: &str, sink: FragmentSender) {
        if let Err(e) = self.converse(user_id, message, &sink).await {
            warn!(user_id = %user_id, "Chat turn failed: {}", e);
            if sink.send(Err(e)).await.is_err() {
                debug!("Chat receiver gone before the failure was delivered");
            }
        }
    }

    async fn converse(
        &self,
        user_id: &str,
        message: &str,
        sink: &FragmentSender,
    ) -> Result<(), AppError> {
        let capabilities = self.provider.capabilities();
        if !capabilities.supports_streaming() || !capabilities.supports_function_calling() {
            return Err(AppError::config(format!(
                "provider {} cannot stream tool calls",
                self.provider.name()
            )));
        }

        let memory = self.sessions.get(user_id);
        let now = Local::now().naive_local();

        let mut messages = vec![ChatMessage::system(build_system_prompt(now.date(), now))];
        messages.extend(memory.recent(self.retrieve_size).await);
        messages.push(ChatMessage::user(message));

        let definitions = self.tools.definitions();
        let mut answer = String::new();

        for round in 1..=MAX_TOOL_ROUNDS {
            let mut request = ChatRequest::new(messages.clone())
                .with_streaming()
                .with_tools(definitions.clone());
            if let Some(model) = &self.model {
                request = request.with_model(model.clone());
            }

            let mut stream = self.provider.complete_stream(&request).await?;
            let mut text = String::new();
            let mut calls = ToolCallAccumulator::default();

            while let Some(chunk) = stream.next().await {
                let chunk = chunk?;
                calls.absorb(&chunk.tool_calls);
                if chunk.delta.is_empty() {
                    continue;
                }
                text.push_str(&chunk.delta);
                if sink.send(Ok(chunk.delta)).await.is_err() {
                    debug!(user_id = %user_id, "Chat receiver dropped, abandoning turn");
                    return Ok(());
                }
            }

            answer.push_str(&text);
            let calls = calls.finish();
            if calls.is_empty() {
                break;
            }

            info!(round, calls = calls.len(), "Model requested tool calls");
            messages.push(ChatMessage::assistant_tool_calls(text, calls.clone()));
            for call in calls {
                let result = self.tools.dispatch(&call.name, &call.arguments).await;
                messages.push(ChatMessage::tool_result(call.id, result));
            }

            if round == MAX_TOOL_ROUNDS {
                warn!(user_id = %user_id, "Tool round limit reached, ending turn");
            }
        }

        memory
            .append([ChatMessage::user(message), ChatMessage::assistant(answer)])
            .await;
        Ok(())
    }
}
