// Overseas.ai backend HTTP client.
// Handles authentication, rate limit headers, and response status mapping.

use std::sync::{Mutex, PoisonError};

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

const CLIENT_USER_AGENT: &str = concat!("overseas-api/", env!("CARGO_PKG_VERSION"));

/// Rate limit state reported by the backend's response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    /// Seconds to wait, from the last `Retry-After` header seen.
    pub retry_after: Option<u64>,
}

/// HTTP client for the Overseas.ai backend.
pub struct ApiClient {
    client: Client,
    base_url: String,
    rate_limit: Mutex<RateLimit>,
}

impl ApiClient {
    /// Create a client for the configured backend.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ApiError::InvalidConfig(e.to_string()))?,
            );
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the rate limit reported by the most recent response.
    pub fn rate_limit(&self) -> RateLimit {
        *self.rate_limit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make a GET request to the backend.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await.map_err(ApiError::Http)?;

        self.update_rate_limit(&response);
        check_response(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(ApiError::Http)?;

        self.update_rate_limit(&response);
        check_response(response).await
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.get(endpoint).await?;
        Ok(response.json().await?)
    }

    /// GET a JSON document with query parameters.
    pub async fn get_json_with_params<T, P>(&self, endpoint: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let response = self.get_with_params(endpoint, params).await?;
        Ok(response.json().await?)
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let headers = response.headers();
        let mut rate_limit = self
            .rate_limit
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(limit) = header_u64(headers, "x-ratelimit-limit") {
            rate_limit.limit = Some(limit);
        }
        if let Some(remaining) = header_u64(headers, "x-ratelimit-remaining") {
            rate_limit.remaining = Some(remaining);
        }
        rate_limit.retry_after = header_u64(headers, RETRY_AFTER.as_str());
    }
}

/// Parse a numeric header value.
fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let retry_after = header_u64(response.headers(), RETRY_AFTER.as_str());
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, url, retry_after, body))
}

/// Map a non-success status to an error.
fn status_error(status: StatusCode, url: String, retry_after: Option<u64>, body: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(url),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { retry_after },
        status => ApiError::Status { status, body },
    }
}
