//! Conversation persistence

use reqwest::{Method, StatusCode};
use tracing::{debug, info};

use super::core::{decode_json, expect_status, Client, RequestBody};
use crate::error::{Error, Result};
use crate::types::{ConversationThread, SaveConversationRequest, SaveConversationResponse};

const SAVE_PATH: &str = "/api/v1/save";

fn validate_save_request(request: &SaveConversationRequest) -> Result<()> {
    if request.assistant_id.is_empty() {
        return Err(Error::InvalidInput("assistantId is required".to_string()));
    }
    if request.conversation.is_empty() {
        return Err(Error::InvalidInput("conversation is required".to_string()));
    }
    Ok(())
}

impl Client {
    pub async fn save_conversation(
        &self,
        request: &SaveConversationRequest,
    ) -> Result<SaveConversationResponse> {
        validate_save_request(request)?;
        debug!(
            "Saving conversation with assistant {}",
            request.assistant_id
        );

        let response = self
            .send(Method::POST, SAVE_PATH, RequestBody::json(request)?)
            .await?;
        expect_status(&response, &[StatusCode::OK, StatusCode::CREATED])?;

        let saved: SaveConversationResponse = decode_json(response).await?;
        info!("Saved conversation as thread {}", saved.id);
        Ok(saved)
    }

    /// Look up a thread by id in the user's thread list
    pub async fn get_conversation(&self, thread_id: &str) -> Result<ConversationThread> {
        debug!("Fetching conversation thread {}", thread_id);
        let threads = self.get_user_threads(None).await?;
        threads
            .threads
            .into_iter()
            .find(|thread| thread.id == thread_id)
            .ok_or_else(|| Error::NotFound(format!("thread {thread_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_requires_fields() {
        let mut request = SaveConversationRequest::default();
        assert!(matches!(
            validate_save_request(&request),
            Err(Error::InvalidInput(msg)) if msg.contains("assistantId")
        ));

        request.assistant_id = "asst_1".to_string();
        assert!(matches!(
            validate_save_request(&request),
            Err(Error::InvalidInput(msg)) if msg.contains("conversation")
        ));

        request.conversation = "User: hi\nAssistant: hello".to_string();
        assert!(validate_save_request(&request).is_ok());
    }
}
