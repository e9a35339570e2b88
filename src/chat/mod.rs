// ABOUTME: Chat orchestration: the model runtime with its tool loop and the SSE pipeline
// ABOUTME: Producer and consumer are joined by a bounded channel and cancel together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

/// Server-sent event framing, timeout, and error classification
pub mod pipeline;
/// Streaming completion with function calling and conversation memory
pub mod runtime;

pub use pipeline::{augment_message, classify_error, frame_content, StreamingPipeline};
pub use runtime::{ModelRuntime, ToolCallAccumulator};
