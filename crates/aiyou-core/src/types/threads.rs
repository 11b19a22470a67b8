//! Conversation thread listing payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored conversation thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationThread {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub thread_id_param: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub assistant_name: String,
    #[serde(default)]
    pub assistant_model: Option<String>,
    #[serde(default)]
    pub assistant_id: serde_json::Value,
    #[serde(default, rename = "assistantIdOpenAi")]
    pub assistant_id_openai: String,
    #[serde(default)]
    pub first_message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_new_app_thread: bool,
    #[serde(default)]
    pub assistant_content_json: String,
}

/// Response of `GET /api/v1/user/threads`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserThreadsOutput {
    #[serde(default)]
    pub threads: Vec<ConversationThread>,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items_per_page: u64,
    #[serde(default)]
    pub current_page: u64,
}

impl UserThreadsOutput {
    pub fn total_pages(&self) -> u64 {
        if self.items_per_page == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.items_per_page)
    }
}

/// Optional server-side filter on the thread list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadFilter {
    #[serde(default)]
    pub assistant_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// Pagination and search parameters for the thread list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserThreadsParams {
    pub page: u32,
    pub items_per_page: u32,
    pub search: Option<String>,
    pub filter: Option<ThreadFilter>,
}

impl UserThreadsParams {
    /// Query pairs; zero values and empty searches are omitted
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page > 0 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.items_per_page > 0 {
            pairs.push(("itemsPerPage", self.items_per_page.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(filter) = &self.filter {
            if let Some(assistant_id) = &filter.assistant_id {
                pairs.push(("assistantId", assistant_id.clone()));
            }
            if let Some(start) = filter.start_date {
                pairs.push(("startDate", start.to_rfc3339()));
            }
            if let Some(end) = filter.end_date {
                pairs.push(("endDate", end.to_rfc3339()));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_unset_values() {
        let params = UserThreadsParams {
            page: 2,
            items_per_page: 0,
            search: Some(String::new()),
            filter: None,
        };
        assert_eq!(params.query_pairs(), vec![("page", "2".to_string())]);
    }

    #[test]
    fn test_query_pairs_include_filter() {
        let params = UserThreadsParams {
            page: 1,
            items_per_page: 10,
            search: Some("invoice".to_string()),
            filter: Some(ThreadFilter {
                assistant_id: Some("asst_9".to_string()),
                ..Default::default()
            }),
        };
        let pairs = params.query_pairs();
        assert_eq!(pairs.len(), 4);
        assert!(pairs.contains(&("itemsPerPage", "10".to_string())));
        assert!(pairs.contains(&("search", "invoice".to_string())));
        assert!(pairs.contains(&("assistantId", "asst_9".to_string())));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let output = UserThreadsOutput {
            total_items: 21,
            items_per_page: 10,
            ..Default::default()
        };
        assert_eq!(output.total_pages(), 3);
        assert_eq!(UserThreadsOutput::default().total_pages(), 0);
    }
}
