//! Conversation thread listing and deletion

use reqwest::{Method, StatusCode};
use tracing::{debug, info};

use super::core::{decode_json, expect_status, Client, RequestBody};
use crate::error::{Error, Result};
use crate::types::{UserThreadsOutput, UserThreadsParams};

pub(crate) const USER_THREADS_PATH: &str = "/api/v1/user/threads";

fn threads_path(params: Option<&UserThreadsParams>) -> String {
    let pairs = params.map(UserThreadsParams::query_pairs).unwrap_or_default();
    if pairs.is_empty() {
        return USER_THREADS_PATH.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(key, value)| (*key, value.as_str())))
        .finish();
    format!("{USER_THREADS_PATH}?{query}")
}

/// Thread ids are interpolated into the path
fn validate_thread_id(thread_id: &str) -> Result<()> {
    if thread_id.is_empty() {
        return Err(Error::InvalidInput("thread id is required".to_string()));
    }
    if thread_id.contains(['/', '?', '#']) {
        return Err(Error::InvalidInput(format!(
            "invalid thread id: {thread_id}"
        )));
    }
    Ok(())
}

impl Client {
    /// One page of the user's conversation threads
    pub async fn get_user_threads(
        &self,
        params: Option<&UserThreadsParams>,
    ) -> Result<UserThreadsOutput> {
        let path = threads_path(params);
        debug!("Fetching threads from {}", path);
        let response = self.send(Method::GET, &path, RequestBody::Empty).await?;
        expect_status(&response, &[StatusCode::OK])?;

        let threads: UserThreadsOutput = decode_json(response).await?;
        info!("Retrieved {} threads", threads.threads.len());
        Ok(threads)
    }

    pub async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        validate_thread_id(thread_id)?;
        debug!("Deleting thread {}", thread_id);
        let response = self
            .send(
                Method::DELETE,
                &format!("/api/v1/threads/{thread_id}"),
                RequestBody::Empty,
            )
            .await?;
        expect_status(&response, &[StatusCode::OK, StatusCode::NO_CONTENT])?;
        info!("Deleted thread {}", thread_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads_path_without_params() {
        assert_eq!(threads_path(None), USER_THREADS_PATH);
        assert_eq!(
            threads_path(Some(&UserThreadsParams::default())),
            USER_THREADS_PATH
        );
    }

    #[test]
    fn test_threads_path_encodes_query() {
        let params = UserThreadsParams {
            page: 2,
            items_per_page: 25,
            search: Some("q1 report".to_string()),
            filter: None,
        };
        assert_eq!(
            threads_path(Some(&params)),
            "/api/v1/user/threads?page=2&itemsPerPage=25&search=q1+report"
        );
    }

    #[test]
    fn test_thread_id_validation() {
        assert!(validate_thread_id("abc-123").is_ok());
        assert!(validate_thread_id("").is_err());
        assert!(validate_thread_id("../admin").is_err());
        assert!(validate_thread_id("a?b=c").is_err());
    }
}
