//! HTTP transport
//!
//! Every request to the iRMC goes through a [`Transport`]. A transport never
//! fails outright: connection problems are reported as an [`Exchange`] with
//! status 99 so callers can treat local and remote failures uniformly.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::types::ClientConfig;

/// Status for a request that raised an exception locally
pub const EXCEPTION_STATUS: u16 = 99;

/// Status for a rejected login
pub const LOGIN_STATUS: u16 = 1;

const LOGIN_REQUIRED: &str = "Login required to continue.";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether `status` counts as success for this method
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            Method::Post => matches!(status, 200 | 202 | 204),
            _ => status == 200,
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add JSON `Accept` and `Content-Type` headers
    pub fn json(self) -> Self {
        self.header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Outcome of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// HTTP status, or a local code below 100
    pub status: u16,
    /// Response body, or a diagnostic for local failures
    pub body: String,
    /// `OK` or a description of the failure
    pub message: String,
    success: bool,
}

impl Exchange {
    /// Build the outcome of a request that got a response
    pub fn completed(request: &HttpRequest, status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if body.contains(LOGIN_REQUIRED) {
            return Self::local(LOGIN_STATUS, "Invalid login data.", LOGIN_REQUIRED);
        }

        let method = request.method.as_str();
        if request.method.accepts(status) {
            return Self {
                status,
                body,
                message: "OK".to_string(),
                success: true,
            };
        }

        let message = match error_message(&body) {
            Some(detail) => format!(
                "{} request was not successful ({}): {}",
                method, request.url, detail
            ),
            None => format!("{} request was not successful ({}).", method, request.url),
        };
        Self {
            status,
            body,
            message,
            success: false,
        }
    }

    /// Build the outcome of a request that raised an error before completing
    pub fn failed(request: &HttpRequest, error: &dyn std::error::Error) -> Self {
        Self::local(
            EXCEPTION_STATUS,
            format!("{error:?}"),
            format!(
                "{} request encountered exception ({}): {}",
                request.method.as_str(),
                request.url,
                error
            ),
        )
    }

    /// Build a failure that never reached the device
    pub fn local(status: u16, body: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            message: message.into(),
            success: false,
        }
    }

    /// Whether the request succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The response body, or the failure as an error
    pub fn into_result(self) -> Result<String> {
        if self.success {
            Ok(self.body)
        } else {
            Err(ClientError::Request {
                status: self.status,
                message: self.message,
            })
        }
    }
}

/// `error.message` of a JSON error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")?.get("message")? {
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Sends requests to the iRMC
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and report its outcome
    async fn send(&self, request: HttpRequest) -> Exchange;
}

/// [`Transport`] over `reqwest` with basic auth and retries
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    username: String,
    password: String,
    retries: u32,
    backoff: Duration,
}

impl ReqwestTransport {
    /// Create a transport from connection settings
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.validate_certs)
            .build()?;

        Ok(Self {
            client,
            username: config.username.clone(),
            password: config.password.clone(),
            retries: config.retries,
            backoff: config.backoff,
        })
    }

    /// Delay before retry `attempt`, doubling from the base backoff
    fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor)
    }

    fn prepare(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &request.url)
            .basic_auth(&self.username, Some(&self.password));
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        builder
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Exchange {
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(method = request.method.as_str(), url = %request.url, attempt, "sending request");

            match self.prepare(&request).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    return match response.text().await {
                        Ok(body) => Exchange::completed(&request, status, body),
                        Err(e) => Exchange::failed(&request, &e),
                    };
                }
                Err(e) if attempt <= self.retries && (e.is_connect() || e.is_timeout()) => {
                    let backoff = self.backoff_for(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        max = self.retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Exchange::failed(&request, &e),
            }
        }
    }
}
