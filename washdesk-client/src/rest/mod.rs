//! REST implementations of the resource traits.

mod attendance;
mod bookings;
mod buildings;
mod enquiries;
mod locations;

pub use attendance::AttendanceClient;
pub use bookings::BookingsClient;
pub use buildings::BuildingsClient;
pub use enquiries::EnquiriesClient;
pub use locations::LocationsClient;

use crate::error::{from_error_body, ClientError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use washdesk_core::{Envelope, Page, PageConvention, QueryParams};

/// Connection settings for [`RestClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &RestConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("base_url is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url,
            auth_header: build_auth_headers(config)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ClientError> {
        tracing::debug!(method = "GET", path, "request");
        let response = self
            .client
            .get(self.url(path))
            .headers(self.auth_header.clone())
            .query(query)
            .send()
            .await?;
        self.parse_response(path, response).await
    }

    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<u8>, ClientError> {
        tracing::debug!(method = "GET", path, "download");
        let response = self
            .client
            .get(self.url(path))
            .headers(self.auth_header.clone())
            .query(query)
            .send()
            .await?;
        let response = self.check_status(path, response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(method = "POST", path, "request");
        let response = self
            .client
            .post(self.url(path))
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        self.parse_response(path, response).await
    }

    pub(crate) async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(method = "PUT", path, "request");
        let response = self
            .client
            .put(self.url(path))
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        self.parse_response(path, response).await
    }

    /// PUT whose response body is ignored.
    pub(crate) async fn put_ack<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        tracing::debug!(method = "PUT", path, "request");
        let response = self
            .client
            .put(self.url(path))
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await?;
        self.check_status(path, response).await.map(|_| ())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        tracing::debug!(method = "DELETE", path, "request");
        let response = self
            .client
            .delete(self.url(path))
            .headers(self.auth_header.clone())
            .send()
            .await?;
        self.check_status(path, response).await.map(|_| ())
    }

    /// GET a list endpoint and unwrap its `{data, total}` envelope.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        convention: PageConvention,
        page: u32,
        limit: u32,
        params: &QueryParams,
    ) -> Result<Page<T>, ClientError> {
        let query = list_query(convention, page, limit, params);
        let envelope: Envelope<T> = self.get_raw(path, &query).await?;
        Ok(envelope.into_page())
    }

    /// GET a body that is decoded as-is, without unwrapping `{data: ...}`.
    /// List envelopes go through here so `total` survives an empty `data`.
    pub(crate) async fn get_raw<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ClientError> {
        tracing::debug!(method = "GET", path, "request");
        let response = self
            .client
            .get(self.url(path))
            .headers(self.auth_header.clone())
            .query(query)
            .send()
            .await?;
        let response = self.check_status(path, response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn check_status(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        tracing::warn!(path, status = status.as_u16(), "request rejected");
        Err(from_error_body(status.as_u16(), &text))
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = self.check_status(path, response).await?;
        let text = response.text().await?;
        decode_unwrapped(&text)
    }
}

/// Query pairs for a paged list call: page keys first, then filters.
pub fn list_query(
    convention: PageConvention,
    page: u32,
    limit: u32,
    params: &QueryParams,
) -> Vec<(String, String)> {
    convention
        .query_pairs(page, limit)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .chain(params.to_pairs())
        .collect()
}

/// Mutation responses arrive either bare or wrapped as `{data: ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Unwrapped<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Unwrapped<T> {
    fn into_inner(self) -> T {
        match self {
            Unwrapped::Wrapped { data } => data,
            Unwrapped::Bare(value) => value,
        }
    }
}

fn decode_unwrapped<T: DeserializeOwned>(text: &str) -> Result<T, ClientError> {
    let body: Unwrapped<T> = serde_json::from_str(text)?;
    Ok(body.into_inner())
}

fn build_auth_headers(config: &RestConfig) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &config.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| ClientError::Config(e.to_string()))?,
        );
    }
    if let Some(token) = &config.bearer_token {
        let value = format!("Bearer {}", token);
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&value).map_err(|e| ClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}

/// Every resource client, sharing one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    pub locations: Arc<LocationsClient>,
    pub buildings: Arc<BuildingsClient>,
    pub bookings: Arc<BookingsClient>,
    pub enquiries: Arc<EnquiriesClient>,
    pub attendance: Arc<AttendanceClient>,
}

impl ApiClient {
    pub fn new(config: &RestConfig) -> Result<Self, ClientError> {
        let rest = RestClient::new(config)?;
        Ok(Self {
            locations: Arc::new(LocationsClient::new(rest.clone())),
            buildings: Arc::new(BuildingsClient::new(rest.clone())),
            bookings: Arc::new(BookingsClient::new(rest.clone())),
            enquiries: Arc::new(EnquiriesClient::new(rest.clone())),
            attendance: Arc::new(AttendanceClient::new(rest)),
        })
    }
}
