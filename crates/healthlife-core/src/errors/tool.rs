// ABOUTME: Tool-specific error types for the health function catalogue
// ABOUTME: Rendered into status strings before they ever reach the model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Tool Error Types
//!
//! Errors raised while dispatching a model tool call. The dispatcher turns every
//! variant into a status string via `Display`, so the model always gets text back.

use std::error::Error;
use std::fmt;

use super::{AppError, ErrorCode};

/// Errors specific to tool dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Model asked for a tool name that is not in the catalogue
    UnknownTool {
        /// Name the model sent
        tool_name: String,
    },
    /// Arguments did not decode into the tool's request type
    InvalidArguments {
        /// Name of the tool
        tool_name: String,
        /// Decoder message
        reason: String,
    },
    /// Tool is switched off by configuration
    Disabled {
        /// Name of the disabled tool
        tool_name: String,
    },
}

impl ToolError {
    /// Create an "unknown tool" error
    #[must_use]
    pub fn unknown_tool(tool_name: impl Into<String>) -> Self {
        Self::UnknownTool {
            tool_name: tool_name.into(),
        }
    }

    /// Create an "invalid arguments" error
    #[must_use]
    pub fn invalid_arguments(tool_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool_name: tool_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a "disabled" error
    #[must_use]
    pub fn disabled(tool_name: impl Into<String>) -> Self {
        Self::Disabled {
            tool_name: tool_name.into(),
        }
    }

    /// Get the tool name associated with this error
    #[must_use]
    pub fn tool_name(&self) -> &str {
        match self {
            Self::UnknownTool { tool_name }
            | Self::InvalidArguments { tool_name, .. }
            | Self::Disabled { tool_name } => tool_name,
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTool { tool_name } => write!(f, "错误：未知的工具 '{tool_name}'"),
            Self::InvalidArguments { tool_name, reason } => {
                write!(f, "错误：工具 '{tool_name}' 的参数无效: {reason}")
            }
            Self::Disabled { tool_name } => write!(f, "错误：工具 '{tool_name}' 当前未启用"),
        }
    }
}

impl Error for ToolError {}

impl From<ToolError> for AppError {
    fn from(error: ToolError) -> Self {
        let code = match error {
            ToolError::UnknownTool { .. } => ErrorCode::ResourceNotFound,
            ToolError::InvalidArguments { .. } | ToolError::Disabled { .. } => {
                ErrorCode::InvalidInput
            }
        };
        Self::new(code, error.to_string())
    }
}
