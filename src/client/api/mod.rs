//! REST API Client
//!
//! Thin async wrappers over the board server's REST API, one module per
//! entity. Every wrapper issues exactly one request and decodes the JSON
//! response into the shared model; timestamps and polymorphic activity
//! payloads are normalized by the model's serde adapters.
//!
//! The client keeps a cookie store, so the session cookie set by
//! [`ApiClient::login`] authenticates every later call (and the push
//! channel, which shares the same `reqwest::Client`).
//!
//! There is no retry, pagination or caching here.

pub mod archive;
pub mod auth;
pub mod board;
pub mod card;
pub mod checklist;
pub mod list;

use crate::client::config::Config;
use crate::client::error::ClientError;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Board server API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.app().request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying HTTP client, shared with the push-channel transport
    pub fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_json(self.request(Method::GET, path)).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::POST, path).json(body)).await
    }

    pub(crate) async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.request(Method::PATCH, path).json(body)).await
    }

    /// PATCH without a request body
    pub(crate) async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send_json(self.request(Method::PATCH, path)).await
    }

    /// POST whose response body is ignored
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await.map(|_| ())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path)).await.map(|_| ())
    }

    /// DELETE carrying a JSON body
    pub(crate) async fn delete_with<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path).json(body)).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.api_url(path);
        tracing::debug!("[API] {} {}", method, url);
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        tracing::warn!("[API] Request failed: {} - {}", status, body);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthenticated);
        }
        Err(ClientError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let url = response.url().to_string();
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Decode {
            url,
            message: e.to_string(),
        })
    }
}
