//! The REST client every provider talks through.

use crate::body::RequestBody;
use crate::config::ApiConfig;
use crate::envelope;
use crate::error::{ApiError, ApiResult};
use crate::token::TokenStore;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A single request, before it is sent.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    /// Overrides the stored token for this request only.
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: impl Into<RequestBody>) -> Self {
        Self::new(Method::POST, path).body(body)
    }

    pub fn put(path: impl Into<String>, body: impl Into<RequestBody>) -> Self {
        Self::new(Method::PUT, path).body(body)
    }

    pub fn patch(path: impl Into<String>, body: impl Into<RequestBody>) -> Self {
        Self::new(Method::PATCH, path).body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query.extend(query);
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// HTTP client with bearer auth and content negotiation.
///
/// Successful responses come back as parsed JSON (or a JSON string holding
/// the raw text for non-JSON responses) with the `success` convention
/// already checked. Envelope keys are left in place; see
/// [`envelope::unwrap_payload`].
pub struct ApiClient {
    config: ApiConfig,
    client: Client,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Creates a client. Fails on an invalid configuration.
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> ApiResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn get_with_query(&self, path: &str, query: Vec<(String, String)>) -> ApiResult<Value> {
        self.send(ApiRequest::get(path).query(query)).await
    }

    pub async fn post(&self, path: &str, body: impl Into<RequestBody>) -> ApiResult<Value> {
        self.send(ApiRequest::post(path, body)).await
    }

    pub async fn put(&self, path: &str, body: impl Into<RequestBody>) -> ApiResult<Value> {
        self.send(ApiRequest::put(path, body)).await
    }

    pub async fn patch(&self, path: &str, body: impl Into<RequestBody>) -> ApiResult<Value> {
        self.send(ApiRequest::patch(path, body)).await
    }

    /// DELETE, optionally with a body (ownership checks, id lists).
    pub async fn delete(&self, path: &str, body: Option<RequestBody>) -> ApiResult<Value> {
        let mut request = ApiRequest::delete(path);
        request.body = body;
        self.send(request).await
    }

    /// Sends a request and normalizes its response.
    pub async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let ApiRequest {
            method,
            path,
            query,
            body,
            token,
        } = request;
        let url = self.url(&path);

        debug!("{} {}", method, url);

        let mut builder = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(token) = token.or_else(|| self.tokens.token()) {
            builder = builder.bearer_auth(token);
        }
        builder = match body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(form)) => builder.multipart(form.into_form()?),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ApiError::Transport(format!("{method} {path}: {e}"))
        })?;

        Self::read_response(response).await
    }

    async fn read_response(response: Response) -> ApiResult<Value> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            let message = is_json
                .then(|| serde_json::from_str::<Value>(&text).ok())
                .flatten()
                .and_then(|body| envelope::message(&body))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                });
            debug!("HTTP {} error: {}", status.as_u16(), message);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if !is_json {
            return Ok(Value::String(text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("invalid JSON: {e}")))?;
        envelope::check_success(value)
    }
}
