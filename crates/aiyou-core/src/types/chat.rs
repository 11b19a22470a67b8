//! Chat completion payloads

use serde::{Deserialize, Deserializer, Serialize};

/// One part of a message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }

    /// Image parts carry the image URL in the `text` field
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: "image".to_string(),
            text: url.into(),
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub role: String,
    /// Accepts either a list of parts or a bare string on the wire
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Vec<ContentPart>,
}

impl Message {
    /// Concatenated text of every text part
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter(|part| part.kind == "text")
            .map(|part| part.text.as_str())
            .collect()
    }
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<Vec<ContentPart>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Content {
        Text(String),
        Parts(Vec<ContentPart>),
        Null(()),
    }

    Ok(match Content::deserialize(deserializer)? {
        Content::Text(text) => vec![ContentPart::text(text)],
        Content::Parts(parts) => parts,
        Content::Null(()) => Vec::new(),
    })
}

/// Request body of `POST /api/v1/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<Message>,
    #[serde(rename = "assistantId")]
    pub assistant_id: String,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(rename = "promptSystem")]
    pub prompt_system: String,
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(
        rename = "threadId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thread_id: Option<String>,
}

impl ChatCompletionRequest {
    /// Request with the platform's default sampling parameters
    pub fn new(messages: Vec<Message>, assistant_id: impl Into<String>) -> Self {
        Self {
            messages,
            assistant_id: assistant_id.into(),
            temperature: 0.7,
            top_p: 1.0,
            prompt_system: String::new(),
            stream: false,
            stop: Vec::new(),
            thread_id: None,
        }
    }
}

/// Token accounting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Incremental content of a streamed choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    /// Present on non-streamed responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    /// Present on streamed fragments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Delta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// A full response, or one fragment of a streamed response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice's message
    pub fn text(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .map(Message::text_content)
            .unwrap_or_default()
    }

    /// Concatenated delta contents of a streamed fragment
    pub fn delta_text(&self) -> String {
        self.choices
            .iter()
            .filter_map(|choice| choice.delta.as_ref())
            .filter_map(|delta| delta.content.as_deref())
            .collect()
    }
}
