//! Helpers for building chat messages

use tracing::debug;

use crate::mask::mask_sensitive;
use crate::types::{ContentPart, Message};

impl Message {
    /// Message with a single text part
    pub fn text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: vec![ContentPart::text(text)],
        }
    }

    /// Message with a single image part
    pub fn image(role: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: vec![ContentPart::image(url)],
        }
    }
}

/// Incrementally assemble a multi-part message
///
/// ```
/// use aiyou_core::MessageBuilder;
///
/// let message = MessageBuilder::new("user")
///     .add_text("What is in this picture?")
///     .add_image("https://example.com/cat.png")
///     .build();
/// assert_eq!(message.content.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            message: Message {
                role: role.into(),
                content: Vec::new(),
            },
        }
    }

    pub fn add_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        debug!("Adding text content: {}", mask_sensitive(&text));
        self.message.content.push(ContentPart::text(text));
        self
    }

    pub fn add_image(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        debug!("Adding image content: {}", mask_sensitive(&url));
        self.message.content.push(ContentPart::image(url));
        self
    }

    pub fn build(self) -> Message {
        debug!(
            "Built message with {} content parts",
            self.message.content.len()
        );
        self.message
    }
}
