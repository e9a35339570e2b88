// ABOUTME: Dispatches model function calls to typed tool handlers by catalogue id
// ABOUTME: Decodes JSON arguments, runs the handler, and always answers with a string
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Tool Registry
//!
//! The registry owns the [`ToolContext`] and maps each [`ToolId`] to its handler.
//! Unknown names and undecodable arguments come back as `错误：` strings so the
//! model can correct itself on the next round.

use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use healthlife_core::errors::ToolError;

use super::catalogue::{id_field, ToolId};
use super::context::ToolContext;
use super::implementations::{body, diet, exercise, sleep, web_search};
use super::requests::{
    BodyMetricRequest, DietRecordRequest, ExerciseRecordRequest, SleepRecordRequest,
};
use crate::llm::ToolDefinition;

/// Catalogue of callable tools bound to their dependencies
#[derive(Clone)]
pub struct ToolRegistry {
    context: ToolContext,
}

impl ToolRegistry {
    /// Registry over `context`
    #[must_use]
    pub fn new(context: ToolContext) -> Self {
        info!(
            tools = ToolId::ALL.len(),
            web_search = context.web_search.is_some(),
            "Tool registry ready"
        );
        Self { context }
    }

    /// Shared dependencies
    #[must_use]
    pub const fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Function declarations attached to every model request
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        ToolId::ALL
            .into_iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    /// Run the function `name` with JSON `arguments`; errors become status strings
    #[instrument(skip(self, arguments), fields(tool = %name))]
    pub async fn dispatch(&self, name: &str, arguments: &str) -> String {
        let outcome = match ToolId::from_name(name) {
            Some(tool) => self.execute(tool, arguments).await,
            None => Err(ToolError::unknown_tool(name)),
        };
        outcome.unwrap_or_else(|e| {
            warn!(tool = %name, "Tool call rejected: {}", e);
            e.to_string()
        })
    }

    /// Decode arguments for `tool` and run its handler
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidArguments`] when the arguments do not decode
    pub async fn execute(&self, tool: ToolId, arguments: &str) -> Result<String, ToolError> {
        let ctx = &self.context;
        Ok(match tool {
            ToolId::QueryBodyMetrics => body::query(ctx, decode(tool, arguments)?).await,
            ToolId::AddBodyMetric => body::add(ctx, decode(tool, arguments)?).await,
            ToolId::GetBodyMetricDetail => body::detail(ctx, decode(tool, arguments)?).await,
            ToolId::UpdateBodyMetric => {
                let request: BodyMetricRequest = decode(tool, arguments)?;
                body::update(ctx, require_id(tool, request.id)?, request).await
            }
            ToolId::DeleteBodyMetric => body::delete(ctx, decode(tool, arguments)?).await,

            ToolId::QueryDietRecords => diet::query(ctx, decode(tool, arguments)?).await,
            ToolId::AddDietRecord => diet::add(ctx, decode(tool, arguments)?).await,
            ToolId::UpdateDietRecord => {
                let request: DietRecordRequest = decode(tool, arguments)?;
                diet::update(ctx, require_id(tool, request.id)?, request).await
            }
            ToolId::GetDietRecordDetail => diet::detail(ctx, decode(tool, arguments)?).await,
            ToolId::DeleteDietRecord => diet::delete(ctx, decode(tool, arguments)?).await,

            ToolId::QueryExerciseRecords => exercise::query(ctx, decode(tool, arguments)?).await,
            ToolId::AddExerciseRecord => exercise::add(ctx, decode(tool, arguments)?).await,
            ToolId::UpdateExerciseRecord => {
                let request: ExerciseRecordRequest = decode(tool, arguments)?;
                exercise::update(ctx, require_id(tool, request.id)?, request).await
            }
            ToolId::GetExerciseRecordDetail => {
                exercise::detail(ctx, decode(tool, arguments)?).await
            }
            ToolId::DeleteExerciseRecord => exercise::delete(ctx, decode(tool, arguments)?).await,

            ToolId::QuerySleepRecords => sleep::query(ctx, decode(tool, arguments)?).await,
            ToolId::AddSleepRecord => sleep::add(ctx, decode(tool, arguments)?).await,
            ToolId::UpdateSleepRecord => {
                let request: SleepRecordRequest = decode(tool, arguments)?;
                sleep::update(ctx, require_id(tool, request.id)?, request).await
            }
            ToolId::GetSleepRecordDetail => sleep::detail(ctx, decode(tool, arguments)?).await,
            ToolId::DeleteSleepRecord => sleep::delete(ctx, decode(tool, arguments)?).await,

            ToolId::WebSearch => web_search::web_search(ctx, decode(tool, arguments)?).await,
        })
    }
}

fn decode<T: DeserializeOwned>(tool: ToolId, arguments: &str) -> Result<T, ToolError> {
    let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
    serde_json::from_str(arguments).map_err(|e| ToolError::invalid_arguments(tool.name(), e.to_string()))
}

fn require_id(tool: ToolId, id: Option<i64>) -> Result<i64, ToolError> {
    id.ok_or_else(|| {
        let field = tool.target().map_or("id", |(kind, _)| id_field(kind).0);
        ToolError::invalid_arguments(tool.name(), format!("missing field `{field}`"))
    })
}
