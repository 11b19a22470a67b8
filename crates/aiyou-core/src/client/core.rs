//! Client struct and the authenticated request pipeline
//!
//! Every request goes through the same steps: rate limit check, then inside
//! the retry executor: authenticate, build, send, classify status.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::mask::mask_sensitive;
use crate::rate_limit::RateLimiter;
use crate::retry::retry_operation;

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) auth: Authenticator,
    pub(crate) limiter: Option<RateLimiter>,
    pub(crate) config: ClientConfig,
}

/// Authenticated, rate-limited, retrying AI.YOU client
///
/// Cheap to clone; clones share the HTTP pool, credential and rate limiter.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
    pub(crate) cancel: CancellationToken,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.config.base_url())
            .field("auth", &self.inner.auth)
            .field("rate_limited", &self.inner.limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Body of an outgoing request, replayable across retries
pub(crate) enum RequestBody {
    Empty,
    Json(Bytes),
    Multipart(MultipartUpload),
}

impl RequestBody {
    pub(crate) fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self> {
        Ok(RequestBody::Json(Bytes::from(serde_json::to_vec(body)?)))
    }
}

/// File upload rebuilt into a fresh multipart form on every attempt
pub(crate) struct MultipartUpload {
    pub(crate) file_name: String,
    pub(crate) mime: String,
    pub(crate) data: Bytes,
    pub(crate) fields: Vec<(&'static str, String)>,
}

impl MultipartUpload {
    fn to_form(&self) -> Result<Form> {
        let part = Part::bytes(self.data.to_vec())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)
            .map_err(|e| Error::InvalidInput(format!("invalid mime type '{}': {}", self.mime, e)))?;
        let form = self
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| form.text(*name, value.clone()));
        Ok(form.part("file", part))
    }
}

impl Client {
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.auth
    }

    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.inner.limiter.as_ref()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// A clone that shares all state but is cancelled by `token`
    ///
    /// Cancelling aborts rate limiter waits, backoff sleeps and in-flight
    /// sends of requests issued through the returned client.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            inner: self.inner.clone(),
            cancel: token,
        }
    }

    /// Send an authenticated request and return the unconsumed response
    ///
    /// `body` is serialized as JSON. Non-success statuses are turned into
    /// errors; network failures and 429s are retried per the client's retry
    /// config.
    pub async fn authenticated_request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let body = match body {
            Some(body) => RequestBody::json(body)?,
            None => RequestBody::Empty,
        };
        self.send(method, path, body).await
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Response> {
        if let Some(limiter) = &self.inner.limiter {
            if let Err(e) = limiter.wait(&self.cancel).await {
                let wait = limiter.wait_time();
                debug!("Rate limiter rejected {} {}: {}", method, path, e);
                return Err(Error::client_rate_limit(wait));
            }
        }

        let url = format!("{}{}", self.inner.config.base_url(), path);
        let cancel = &self.cancel;
        let (method, url, body) = (&method, url.as_str(), &body);

        retry_operation(cancel, &self.inner.config.retry, || async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Error::Cancelled),
                result = self.attempt(method, url, body) => result,
            }
        })
        .await
    }

    async fn attempt(&self, method: &Method, url: &str, body: &RequestBody) -> Result<Response> {
        self.inner.auth.authenticate().await?;

        let request = self
            .inner
            .http
            .request(method.clone(), url)
            .bearer_auth(self.inner.auth.token());
        let request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(bytes) => request
                .header(CONTENT_TYPE, "application/json")
                .body(bytes.clone()),
            RequestBody::Multipart(upload) => request.multipart(upload.to_form()?),
        };

        debug!("{} {}", method, url);
        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            Error::network(e)
        })?;
        classify_response(response).await
    }
}

/// Map a non-success status to the error taxonomy
async fn classify_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = parse_retry_after(response.headers());
        warn!("Server rate limit hit, retry after {:?}", retry_after);
        return Err(Error::server_rate_limit(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| extract_error_message(&value))
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status code")
                .to_string()
        });
    let message = mask_sensitive(&message).into_owned();
    warn!("API error {}: {}", status.as_u16(), message);
    Err(Error::api(status.as_u16(), message))
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Human readable message from an error body's `error`, `message` or
/// `detail` member
pub(crate) fn extract_error_message(value: &Value) -> Option<String> {
    ["error", "message", "detail"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|field| match field {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(_) => extract_error_message(field),
            _ => None,
        })
}

/// Read the whole body and decode it as JSON
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await.map_err(Error::network)?;
    serde_json::from_slice(&body).map_err(|e| {
        warn!("Failed to decode response body: {}", e);
        Error::Decode(e)
    })
}

/// Reject a 2xx status outside of `expected`
pub(crate) fn expect_status(response: &Response, expected: &[StatusCode]) -> Result<()> {
    let status = response.status();
    if expected.contains(&status) {
        return Ok(());
    }
    Err(Error::api(
        status.as_u16(),
        format!("unexpected status code: {}", status.as_u16()),
    ))
}
