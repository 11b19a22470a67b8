//! Request and response payloads of the AI.YOU REST API
//!
//! Decoding is lenient: missing fields fall back to their defaults so that
//! schema drift on the server side does not break callers.

pub mod assistants;
pub mod audio;
pub mod chat;
pub mod conversation;
pub mod models;
pub mod threads;

pub use assistants::{Assistant, AssistantsResponse, ThreadHistory};
pub use audio::{AudioTranscriptionRequest, AudioTranscriptionResponse, SupportedAudioFormat};
pub use chat::{
    ChatCompletionRequest, ChatCompletionResponse, Choice, ContentPart, Delta, Message, Usage,
};
pub use conversation::{SaveConversationRequest, SaveConversationResponse};
pub use models::{Model, ModelProperties, ModelRequest, ModelResponse, ModelsResponse};
pub use threads::{ConversationThread, ThreadFilter, UserThreadsOutput, UserThreadsParams};
