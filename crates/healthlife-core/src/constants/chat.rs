// ABOUTME: Chat pipeline constants: timeouts, memory window, wire framing, user messages
// ABOUTME: Messages are user-facing Chinese text emitted in the event stream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

/// Default timeout over a whole chat stream
pub const DEFAULT_STREAM_TIMEOUT_SECS: u64 = 120;

/// Default number of memory turns attached to each model request
pub const DEFAULT_RETRIEVE_SIZE: usize = 10;

/// Maximum model round-trips spent on tool calls in one turn
pub const MAX_TOOL_ROUNDS: usize = 10;

/// Channel depth between the model producer and the framing consumer
pub const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Content type of the event stream
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream;charset=UTF-8";

/// Terminal event of every stream
pub const CLOSE_EVENT: &str = "event: close\n\n";

/// Notice for a blank message
pub const EMPTY_MESSAGE_NOTICE: &str = "消息不能为空";

/// Upstream unavailable
pub const MSG_SERVICE_UNAVAILABLE: &str = "AI 服务暂时不可用，请稍后再试";

/// Upstream rate limited
pub const MSG_RATE_LIMITED: &str = "请求过于频繁，请稍后再试";

/// No data before the deadline
pub const MSG_TIMEOUT: &str = "AI 响应超时，请稍后重试";

/// Anything else
pub const MSG_GENERIC_FAILURE: &str = "抱歉，处理您的请求时出现错误，请稍后重试";

/// Reply body of a memory reset
pub const MEMORY_CLEARED: &str = "已开始新对话";
