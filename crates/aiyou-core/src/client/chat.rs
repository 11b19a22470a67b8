//! Chat completion endpoints

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use super::core::{decode_json, extract_error_message, Client, RequestBody};
use crate::error::{Error, Result};
use crate::sse::StreamReader;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, Choice, Message, Usage};

const CHAT_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// Whether a server error message says the assistant only answers in
/// streaming mode
fn requires_streaming(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("stream")
        && ["required", "must", "only"]
            .iter()
            .any(|word| message.contains(word))
}

impl Client {
    /// Non-streaming chat completion
    ///
    /// Assistants that only answer in streaming mode are handled
    /// transparently: the request is re-issued as a stream and the fragments
    /// are folded into a single response.
    pub async fn chat_completion(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        request.stream = false;
        debug!(
            "Chat completion for assistant {} with {} messages",
            request.assistant_id,
            request.messages.len()
        );

        let body = RequestBody::json(&request)?;
        let response = match self.send(Method::POST, CHAT_COMPLETIONS_PATH, body).await {
            Ok(response) => response,
            Err(Error::Api { status, message })
                if status < 500 && requires_streaming(&message) =>
            {
                info!("Assistant requires streaming, falling back ({})", status);
                return self.aggregate_stream(request).await;
            }
            Err(e) => return Err(e),
        };

        let status = response.status().as_u16();
        let value: Value = decode_json(response).await?;
        let error = value
            .get("error")
            .filter(|e| !e.is_null())
            .and_then(|_| extract_error_message(&value));
        if let Some(message) = error {
            if requires_streaming(&message) {
                info!("Assistant requires streaming, falling back");
                return self.aggregate_stream(request).await;
            }
            return Err(Error::api(status, message));
        }

        let completion: ChatCompletionResponse = serde_json::from_value(value)?;
        info!(
            "Chat completion {} received with {} choices",
            completion.id,
            completion.choices.len()
        );
        Ok(completion)
    }

    /// Streaming chat completion; the caller reads fragments from the
    /// returned reader
    pub async fn chat_completion_stream(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<StreamReader> {
        request.stream = true;
        debug!(
            "Streaming chat completion for assistant {}",
            request.assistant_id
        );
        let body = RequestBody::json(&request)?;
        let response = self.send(Method::POST, CHAT_COMPLETIONS_PATH, body).await?;
        Ok(StreamReader::from_response(response))
    }

    /// Chat completion with default sampling parameters
    pub async fn create_chat_completion(
        &self,
        messages: Vec<Message>,
        assistant_id: &str,
    ) -> Result<ChatCompletionResponse> {
        self.chat_completion(ChatCompletionRequest::new(messages, assistant_id))
            .await
    }

    /// Streaming chat completion with default sampling parameters
    pub async fn create_chat_completion_stream(
        &self,
        messages: Vec<Message>,
        assistant_id: &str,
    ) -> Result<StreamReader> {
        self.chat_completion_stream(ChatCompletionRequest::new(messages, assistant_id))
            .await
    }

    async fn aggregate_stream(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let mut reader = self.chat_completion_stream(request).await?;

        let mut aggregated = ChatCompletionResponse {
            object: "chat.completion".to_string(),
            ..Default::default()
        };
        let mut content = String::new();
        let mut finish_reason = None;
        let mut usage: Option<Usage> = None;

        while let Some(fragment) = reader.read_chunk().await? {
            if aggregated.id.is_empty() {
                aggregated.id = fragment.id.clone();
                aggregated.created = fragment.created;
                aggregated.model = fragment.model.clone();
            }
            for choice in &fragment.choices {
                if let Some(text) = choice.delta.as_ref().and_then(|d| d.content.as_deref()) {
                    content.push_str(text);
                }
                if choice.finish_reason.is_some() {
                    finish_reason = choice.finish_reason.clone();
                }
            }
            if fragment.usage.is_some() {
                usage = fragment.usage;
            }
        }
        reader.close();

        debug!("Aggregated {} chars from stream", content.len());
        aggregated.usage = usage;
        aggregated.choices = vec![Choice {
            index: 0,
            message: Some(Message::text("assistant", content)),
            delta: None,
            finish_reason,
        }];
        Ok(aggregated)
    }
}
