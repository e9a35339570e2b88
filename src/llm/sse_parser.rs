// ABOUTME: Line-buffering SSE parser for upstream model streaming responses
// ABOUTME: Handles partial lines across TCP boundaries and multiple events per chunk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

//! # SSE Stream Parser
//!
//! Turns the raw byte stream of an OpenAI-style `chat/completions` call into
//! [`StreamChunk`]s. TCP chunks do not line up with SSE events: one chunk may
//! carry several events, and one JSON payload may be split across two chunks.
//! The line buffer accumulates bytes until a full line is available, so a
//! multi-byte character split between reads is decoded only once it is whole.

use std::collections::VecDeque;
use std::mem;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::stream::unfold;
use futures_util::{future, Stream, StreamExt};

use super::{ChatStream, StreamChunk};
use crate::errors::AppError;

/// A parsed SSE event from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A `data:` payload with the prefix stripped
    Data(String),
    /// The `[DONE]` termination signal
    Done,
}

/// Line-buffering SSE parser
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    /// Create a new empty line buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event completed by them.
    ///
    /// A trailing partial line stays buffered for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            if let Some(event) = Self::parse_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Parse whatever is left once the byte stream has ended
    pub fn flush(&mut self) -> Option<SseEvent> {
        let remaining = mem::take(&mut self.buffer);
        Self::parse_line(&String::from_utf8_lossy(&remaining))
    }

    fn parse_line(line: &str) -> Option<SseEvent> {
        let trimmed = line.trim();
        // Non-data fields (event:, id:, retry:, comments) are ignored
        let data = trimmed
            .strip_prefix("data:")
            .map(str::trim_start)
            .filter(|d| !d.is_empty())?;
        if data == "[DONE]" {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(data.to_owned()))
        }
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

struct SseStreamState<F> {
    bytes: ByteStream,
    parser: SseLineBuffer,
    pending: VecDeque<Result<StreamChunk, AppError>>,
    parse_data: F,
    provider_name: &'static str,
    ended: bool,
}

impl<F> SseStreamState<F>
where
    F: Fn(&str) -> Option<Result<StreamChunk, AppError>>,
{
    fn enqueue(&mut self, event: SseEvent) {
        match event {
            SseEvent::Data(json) => {
                if let Some(result) = (self.parse_data)(&json) {
                    self.pending.push_back(result);
                }
            }
            SseEvent::Done => self.pending.push_back(Ok(StreamChunk::done("stop"))),
        }
    }
}

/// Create a buffered SSE stream from a raw byte stream.
///
/// `parse_data` converts one JSON payload into a chunk, or `None` to skip it.
/// Chunks with neither text, tool-call fragments, nor a final marker are dropped.
pub fn create_sse_stream<S, F>(byte_stream: S, parse_data: F, provider_name: &'static str) -> ChatStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    F: Fn(&str) -> Option<Result<StreamChunk, AppError>> + Send + 'static,
{
    let state = SseStreamState {
        bytes: Box::pin(byte_stream),
        parser: SseLineBuffer::new(),
        pending: VecDeque::new(),
        parse_data,
        provider_name,
        ended: false,
    };

    let stream = unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.ended {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(bytes)) => {
                    for event in state.parser.feed(&bytes) {
                        state.enqueue(event);
                    }
                }
                Some(Err(e)) => {
                    state.ended = true;
                    let error = AppError::external_service(
                        state.provider_name,
                        format!("Stream read error: {e}"),
                    );
                    return Some((Err(error), state));
                }
                None => {
                    state.ended = true;
                    if let Some(event) = state.parser.flush() {
                        state.enqueue(event);
                    }
                }
            }
        }
    });

    Box::pin(stream.filter(|result| {
        future::ready(result.as_ref().map_or(true, |chunk| !chunk.is_empty()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_line_is_buffered_until_newline() {
        let mut parser = SseLineBuffer::new();
        assert!(parser.feed(b"data: {\"a\":").is_empty());
        let events = parser.feed(b"1}\n\ndata: [DONE]\n");
        assert_eq!(
            events,
            vec![SseEvent::Data("{\"a\":1}".to_owned()), SseEvent::Done]
        );
    }

    #[test]
    fn test_multibyte_character_split_across_reads() {
        let line = "data: {\"c\":\"早餐\"}\n".as_bytes();
        let split = line.len() - 4;
        let mut parser = SseLineBuffer::new();

        assert!(parser.feed(&line[..split]).is_empty());
        let events = parser.feed(&line[split..]);

        assert_eq!(events, vec![SseEvent::Data("{\"c\":\"早餐\"}".to_owned())]);
    }

    #[test]
    fn test_non_data_fields_are_ignored() {
        let mut parser = SseLineBuffer::new();
        let events = parser.feed(b": keep-alive\nevent: message\nid: 4\ndata: x\r\n");
        assert_eq!(events, vec![SseEvent::Data("x".to_owned())]);
    }

    #[test]
    fn test_flush_returns_unterminated_payload() {
        let mut parser = SseLineBuffer::new();
        assert!(parser.feed(b"data: tail").is_empty());
        assert_eq!(parser.flush(), Some(SseEvent::Data("tail".to_owned())));
        assert_eq!(parser.flush(), None);
    }
}
