//! Model catalogue

use reqwest::Method;
use tracing::{debug, info};

use super::core::{decode_json, Client, RequestBody};
use crate::error::Result;
use crate::types::{ModelRequest, ModelResponse, ModelsResponse};

const MODELS_PATH: &str = "/api/v1/models";

impl Client {
    pub async fn get_models(&self) -> Result<ModelsResponse> {
        debug!("Fetching models from {}", MODELS_PATH);
        let response = self.send(Method::GET, MODELS_PATH, RequestBody::Empty).await?;
        let models: ModelsResponse = decode_json(response).await?;
        info!("Retrieved {} models", models.models.len());
        Ok(models)
    }

    pub async fn create_model(&self, request: &ModelRequest) -> Result<ModelResponse> {
        debug!("Creating model {}", request.name);
        let response = self
            .send(Method::POST, MODELS_PATH, RequestBody::json(request)?)
            .await?;
        let created: ModelResponse = decode_json(response).await?;
        info!("Created model {}", created.model.id);
        Ok(created)
    }
}
