//! Assistant listing

use reqwest::{Method, StatusCode};
use tracing::{debug, info};

use super::core::{decode_json, expect_status, Client, RequestBody};
use crate::error::Result;
use crate::types::AssistantsResponse;

const USER_ASSISTANTS_PATH: &str = "/api/v1/user/assistants";

impl Client {
    /// Assistants available to the authenticated user
    pub async fn get_user_assistants(&self) -> Result<AssistantsResponse> {
        debug!("Fetching user assistants from {}", USER_ASSISTANTS_PATH);
        let response = self
            .send(Method::GET, USER_ASSISTANTS_PATH, RequestBody::Empty)
            .await?;
        expect_status(&response, &[StatusCode::OK])?;

        let assistants: AssistantsResponse = decode_json(response).await?;
        info!("Retrieved {} assistants", assistants.members.len());
        Ok(assistants)
    }
}
