// ABOUTME: Streaming pipeline turning a model turn into framed server-sent events
// ABOUTME: Handles blank input, the overall timeout, error classification, and the close sentinel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # Streaming Pipeline
//!
//! The model turn runs in a spawned producer task that writes fragments into a
//! bounded channel. The consumer side frames each fragment as
//! `data: {"content":"..."}` and always finishes with `event: close`. Failures are
//! never surfaced as HTTP errors: they become exactly one user-facing message.
//!
//! Dropping the returned stream (client disconnect) aborts the producer.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use healthlife_core::constants::chat::{
    CLOSE_EVENT, DEFAULT_STREAM_TIMEOUT_SECS, EMPTY_MESSAGE_NOTICE, MSG_GENERIC_FAILURE,
    MSG_RATE_LIMITED, MSG_SERVICE_UNAVAILABLE, MSG_TIMEOUT, STREAM_CHANNEL_CAPACITY,
};

use super::runtime::ModelRuntime;
use crate::errors::AppError;

const UNAVAILABLE_MARKERS: [&str; 3] = ["503", "service unavailable", "unavailable"];
const RATE_LIMIT_MARKERS: [&str; 3] = ["429", "too many requests", "rate limit"];
const TIMEOUT_MARKERS: [&str; 3] = ["did not observe any item", "timeout", "timed out"];

/// Message handed to the model: the user's text plus the identity to use for tools
#[must_use]
pub fn augment_message(message: &str, user_id: &str) -> String {
    format!("{message}\n\n（当前用户 ID: {user_id}，调用健康数据工具时请使用该 userID）")
}

/// Escape backslash, quote, and the CR/LF/TAB control characters
#[must_use]
pub fn escape_content(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// One `data:` event carrying `text`
#[must_use]
pub fn frame_content(text: &str) -> String {
    format!("data: {{\"content\":\"{}\"}}\n\n", escape_content(text))
}

/// User-facing message for a failed stream, chosen by case-insensitive substring
#[must_use]
pub fn classify_error(error: &str) -> &'static str {
    let error = error.to_lowercase();
    let matches = |markers: &[&str]| markers.iter().any(|marker| error.contains(marker));
    if matches(&UNAVAILABLE_MARKERS) {
        MSG_SERVICE_UNAVAILABLE
    } else if matches(&RATE_LIMIT_MARKERS) {
        MSG_RATE_LIMITED
    } else if matches(&TIMEOUT_MARKERS) {
        MSG_TIMEOUT
    } else {
        MSG_GENERIC_FAILURE
    }
}

/// Aborts the producer task when the consumer goes away
struct ProducerGuard(JoinHandle<()>);

impl Drop for ProducerGuard {
    fn drop(&mut self) {
        if !self.0.is_finished() {
            debug!("Aborting chat producer");
            self.0.abort();
        }
    }
}

enum Step {
    Fragment(Option<Result<String, AppError>>),
    Deadline,
}

/// Frames model turns as server-sent events
#[derive(Clone)]
pub struct StreamingPipeline {
    runtime: Arc<ModelRuntime>,
    timeout: Duration,
}

impl StreamingPipeline {
    /// Pipeline with the default stream timeout
    #[must_use]
    pub fn new(runtime: Arc<ModelRuntime>) -> Self {
        Self {
            runtime,
            timeout: Duration::from_secs(DEFAULT_STREAM_TIMEOUT_SECS),
        }
    }

    /// Replace the whole-stream timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runtime behind the pipeline
    #[must_use]
    pub const fn runtime(&self) -> &Arc<ModelRuntime> {
        &self.runtime
    }

    /// Framed events for one chat turn, always ending with the close sentinel
    pub fn stream(&self, user_id: String, message: String) -> impl Stream<Item = String> + Send {
        let fragments = self.fragments(user_id, message);
        async_stream::stream! {
            tokio::pin!(fragments);
            while let Some(fragment) = fragments.next().await {
                let text = fragment.unwrap_or_else(str::to_owned);
                yield frame_content(&text);
            }
            yield CLOSE_EVENT.to_owned();
        }
    }

    /// Unframed text for one chat turn; a failure ends it with the classified message
    pub fn raw_stream(&self, user_id: String, message: String) -> impl Stream<Item = String> + Send {
        self.fragments(user_id, message)
            .map(|fragment| fragment.unwrap_or_else(str::to_owned))
    }

    /// Non-empty model text, or one terminal user-facing notice
    fn fragments(
        &self,
        user_id: String,
        message: String,
    ) -> impl Stream<Item = Result<String, &'static str>> + Send {
        let runtime = Arc::clone(&self.runtime);
        let timeout = self.timeout;

        async_stream::stream! {
            if message.trim().is_empty() {
                debug!(user_id = %user_id, "Rejecting blank chat message");
                yield Err(EMPTY_MESSAGE_NOTICE);
                return;
            }

            info!(user_id = %user_id, "Starting chat stream");
            let (sink, mut received) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
            let augmented = augment_message(&message, &user_id);
            let producer = ProducerGuard(tokio::spawn(async move {
                runtime.run(&user_id, &augmented, sink).await;
            }));

            let deadline = tokio::time::sleep(timeout);
            tokio::pin!(deadline);

            loop {
                let step = tokio::select! {
                    () = &mut deadline => Step::Deadline,
                    next = received.recv() => Step::Fragment(next),
                };
                match step {
                    Step::Fragment(Some(Ok(text))) => {
                        if !text.is_empty() {
                            yield Ok(text);
                        }
                    }
                    Step::Fragment(Some(Err(e))) => {
                        warn!("Chat stream failed: {}", e);
                        yield Err(classify_error(&e.to_string()));
                        break;
                    }
                    Step::Fragment(None) => break,
                    Step::Deadline => {
                        let reason = format!("chat stream timed out after {}s", timeout.as_secs());
                        warn!("{}", reason);
                        yield Err(classify_error(&reason));
                        break;
                    }
                }
            }

            drop(producer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_covers_quotes_and_control_characters() {
        assert_eq!(escape_content("a\"b\\c\nd\re\tf"), "a\\\"b\\\\c\\nd\\re\\tf");
        assert_eq!(escape_content("早餐"), "早餐");
    }

    #[test]
    fn test_frame_wraps_content() {
        assert_eq!(frame_content("hi"), "data: {\"content\":\"hi\"}\n\n");
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(classify_error("HTTP 503 Service Unavailable"), MSG_SERVICE_UNAVAILABLE);
        assert_eq!(classify_error("Too Many Requests"), MSG_RATE_LIMITED);
        assert_eq!(classify_error("Did not observe any item or terminal signal"), MSG_TIMEOUT);
        assert_eq!(classify_error("connection reset"), MSG_GENERIC_FAILURE);
    }

    #[test]
    fn test_augmented_message_names_the_user() {
        let augmented = augment_message("今天吃了什么", "42");
        assert!(augmented.starts_with("今天吃了什么\n\n"));
        assert!(augmented.contains("当前用户 ID: 42"));
    }
}
