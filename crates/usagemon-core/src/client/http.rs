//! HTTP/JSON implementation of [`UsageService`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ClientError, UsageService};
use crate::config::ServiceSettings;
use crate::usage::{ChatRequest, ChatResponse, UsageRow};

/// Chat endpoint, relative to the service base URL
pub const CHAT_PATH: &str = "/api/llm/chat";
/// Usage summary endpoint, relative to the service base URL
pub const SUMMARY_PATH: &str = "/api/usage/summary";

/// Client for the usage-recording service
#[derive(Debug, Clone)]
pub struct HttpUsageClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpUsageClient {
    /// Create a client for `base_url` with an optional per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    /// Create a client from the `[service]` settings section
    pub fn from_settings(settings: &ServiceSettings) -> Result<Self, ClientError> {
        Self::new(
            settings.base_url.clone(),
            settings.timeout_secs.map(Duration::from_secs),
        )
    }

    /// Base URL every endpoint is resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl UsageService for HttpUsageClient {
    async fn submit_chat(&self, req: ChatRequest) -> Result<ChatResponse, ClientError> {
        let url = self.url(CHAT_PATH);
        debug!(model = %req.model, user_label = %req.user_label, "POST {}", url);

        let response = self.http.post(&url).json(&req).send().await?;
        read_json(response).await
    }

    async fn fetch_usage_summary(&self) -> Result<Vec<UsageRow>, ClientError> {
        let url = self.url(SUMMARY_PATH);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }
}

/// Decode a 2xx body as `T`; any other status yields its raw body as the error
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        debug!(status = status.as_u16(), "request rejected by service");
        return Err(ClientError::RequestFailed {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<T>().await?)
}
