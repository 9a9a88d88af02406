use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;

use crate::stream::StreamState;
use crate::{CompletionClient, CompletionRequest, ExplainError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Longest error body excerpt kept from a failed response
const ERROR_BODY_LIMIT: usize = 500;

/// OpenAI-compatible chat completion client with streaming
#[derive(Clone)]
pub struct ChatCompletionClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl ChatCompletionClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn send_streaming(
        &self,
        request: &CompletionRequest,
        on_partial: &mut (dyn for<'p> FnMut(&'p str) + Send),
    ) -> Result<String, ExplainError> {
        let mut builder = self
            .client
            .post(request.api_url.trim())
            .json(&ChatRequest::new(request));

        if !request.api_key.is_empty() {
            builder = builder.bearer_auth(&request.api_key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body: String = text.chars().take(ERROR_BODY_LIMIT).collect();
            tracing::warn!("[STREAM] HTTP {} from completion endpoint", status);
            return Err(ExplainError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let framing = Framing::of(&response);
        if framing == Framing::Whole {
            tracing::debug!("[STREAM] Server did not stream, reading whole body");
            let body = response.text().await?;
            return Ok(single_shot(&body, on_partial));
        }

        let mut stream = response.bytes_stream();
        let mut state = StreamState::new();

        if framing == Framing::Unknown {
            // No content type, let the first line decide
            let mut head = Vec::new();
            let mut event_stream = None;
            while event_stream.is_none() {
                match stream.next().await {
                    Some(chunk) => {
                        head.extend_from_slice(&chunk?);
                        event_stream = sniff_event_stream(&head);
                    }
                    None => break,
                }
            }

            if !event_stream.unwrap_or_else(|| starts_with_sse_field(&head)) {
                tracing::debug!("[STREAM] Untyped body is not a stream, reading whole body");
                while let Some(chunk) = stream.next().await {
                    head.extend_from_slice(&chunk?);
                }
                return Ok(single_shot(&String::from_utf8_lossy(&head), on_partial));
            }

            if state.feed(&head, &mut *on_partial) {
                return Ok(state.into_text());
            }
        }

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            tracing::trace!("[STREAM] {} bytes", chunk.len());

            if state.feed(&chunk, &mut *on_partial) {
                return Ok(state.into_text());
            }
        }

        tracing::debug!("[STREAM] Stream ended without sentinel");
        Ok(state.finish(&mut *on_partial))
    }
}

impl Default for ChatCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        on_partial: &mut (dyn for<'p> FnMut(&'p str) + Send),
    ) -> Result<String, ExplainError> {
        if request.api_url.trim().is_empty() {
            return Err(ExplainError::ConfigMissing);
        }

        // Dropping the request future closes the connection
        let send = self.send_streaming(request, on_partial);
        match tokio::time::timeout(self.timeout, send).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("[STREAM] No completion within {:?}", self.timeout);
                Err(ExplainError::Timeout(self.timeout))
            }
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl<'a> ChatRequest<'a> {
    fn new(request: &'a CompletionRequest) -> Self {
        Self {
            model: request.model.trim(),
            messages: [ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            stream: true,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }
}

/// Body framing announced by the response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    EventStream,
    Whole,
    Unknown,
}

impl Framing {
    fn of(response: &reqwest::Response) -> Self {
        match response.headers().get(CONTENT_TYPE) {
            Some(value) => {
                let is_stream = value
                    .to_str()
                    .map(|v| v.to_ascii_lowercase().contains("text/event-stream"))
                    .unwrap_or(false);
                if is_stream { Self::EventStream } else { Self::Whole }
            }
            None => Self::Unknown,
        }
    }
}

/// `None` until the first non-blank line is complete
fn sniff_event_stream(head: &[u8]) -> Option<bool> {
    let text = String::from_utf8_lossy(head);
    let rest = text.trim_start();
    rest.contains('\n').then(|| starts_with_sse_field(rest.as_bytes()))
}

fn starts_with_sse_field(head: &[u8]) -> bool {
    let text = String::from_utf8_lossy(head);
    let line = text.trim_start();
    ["data:", "event:", "id:", "retry:", ":"]
        .iter()
        .any(|field| line.starts_with(field))
}

fn single_shot(body: &str, on_partial: &mut (dyn for<'p> FnMut(&'p str) + Send)) -> String {
    let text = single_shot_text(body);
    on_partial(&text);
    text
}

/// Final text of a non-streamed body
fn single_shot_text(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.pointer("/choices/0/message/content")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
