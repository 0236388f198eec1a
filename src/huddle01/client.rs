use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

use crate::config::ProviderContext;
use crate::huddle01::error::{ApiError, ApiResult};
use crate::huddle01::request::ApiRequest;

/// Per-call timeout for every Huddle01 request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_KEY_HEADER: &str = "x-api-key";
pub const PROJECT_ID_HEADER: &str = "x-project-id";

/// HTTP client for the Huddle01 REST API.
///
/// Holds the validated provider context and a pooled reqwest client carrying
/// the authentication headers. It knows nothing about tools: providers hand it
/// an [`ApiRequest`] and get an [`ApiResult`] back, whatever happens on the wire.
#[derive(Debug, Clone)]
pub struct Huddle01Client {
    http: reqwest::Client,
    context: ProviderContext,
}

impl Huddle01Client {
    pub fn new(context: ProviderContext) -> anyhow::Result<Self> {
        Self::with_timeout(context, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(context: ProviderContext, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut api_key = HeaderValue::from_str(context.api_key())
            .context("API key is not a valid header value")?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(
            PROJECT_ID_HEADER,
            HeaderValue::from_str(context.project_id())
                .context("Project id is not a valid header value")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, context })
    }

    /// Issue exactly one HTTP call and classify the outcome.
    pub async fn perform(&self, request: ApiRequest) -> ApiResult {
        let url = request.url(self.context.base_url());
        tracing::debug!(method = %request.method, url = %url, "Calling Huddle01 API");

        let result = self.send(&url, &request).await;
        match &result {
            Ok(_) => {
                tracing::debug!(method = %request.method, url = %url, "Huddle01 call succeeded");
            }
            Err(e) => {
                tracing::warn!(
                    method = %request.method,
                    url = %url,
                    status = ?e.status_code(),
                    error = %e,
                    "Huddle01 call failed"
                );
            }
        }
        result
    }

    async fn send(&self, url: &str, request: &ApiRequest) -> ApiResult {
        let mut builder = self.http.request(request.method.into(), url);

        let query = request.query_pairs();
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        // The response owns the connection; it goes back to the pool when dropped.
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status.as_u16(), response.text().await));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// A non-2xx answer keeps its status even when the body cannot be read.
fn status_error<E: std::fmt::Display>(status: u16, body: Result<String, E>) -> ApiError {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(status, error = %e, "Failed to read error response body");
            String::new()
        }
    };
    ApiError::Status { status, body }
}
