//! Assistant listing payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a past conversation attached to an assistant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadHistory {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub first_message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub assistant_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thread_histories: Vec<ThreadHistory>,
}

/// Response of `GET /api/v1/user/assistants`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantsResponse {
    #[serde(default, alias = "hydra:member", alias = "assistants")]
    pub members: Vec<Assistant>,
    #[serde(default, alias = "hydra:totalItems", alias = "total")]
    pub total_items: u64,
}
