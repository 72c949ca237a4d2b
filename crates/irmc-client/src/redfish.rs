//! Redfish REST client
//!
//! Thin wrapper over the iRMC RESTful interface at `https://<host>/<uri>`.
//! Responses are returned as raw text; [`RedfishClient::get_json`] and
//! [`json_path`] cover the common case of reading one property.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::scci::INVALID_BODY_STATUS;
use crate::transport::{HttpRequest, Method, ReqwestTransport, Transport};
use crate::types::ClientConfig;

/// Status for an etag that is not a number
pub const INVALID_ETAG_STATUS: u16 = 97;

/// Redfish REST client
#[derive(Clone)]
pub struct RedfishClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl std::fmt::Debug for RedfishClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedfishClient")
            .field("host", &self.config.host)
            .finish()
    }
}

impl RedfishClient {
    /// Create a client using the `reqwest` transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client on top of an existing transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    /// Connection settings
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> Result<String> {
        let mut request = HttpRequest::new(method, self.config.rest_url(uri)).json();
        if let Some(body) = body {
            request = request.body(body);
        }
        self.transport.send(request).await.into_result()
    }

    /// GET a resource
    pub async fn get(&self, uri: &str) -> Result<String> {
        self.send(Method::Get, uri, None).await
    }

    /// GET a resource and parse it as JSON
    pub async fn get_json(&self, uri: &str) -> Result<Value> {
        let body = self.get(uri).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a JSON body (empty for actions without parameters)
    pub async fn post(&self, uri: &str, body: &str) -> Result<String> {
        check_json_body(Method::Post, body)?;
        self.send(Method::Post, uri, Some(body)).await
    }

    /// PATCH a resource guarded by its etag
    pub async fn patch(&self, uri: &str, body: &str, etag: &str) -> Result<String> {
        if etag.is_empty() || !etag.chars().all(|c| c.is_ascii_digit()) {
            return Err(ClientError::Request {
                status: INVALID_ETAG_STATUS,
                message: format!("etag is no number: {}", etag),
            });
        }
        check_json_body(Method::Patch, body)?;

        let request = HttpRequest::new(Method::Patch, self.config.rest_url(uri))
            .json()
            .header("If-Match", etag)
            .body(body);
        self.transport.send(request).await.into_result()
    }

    /// DELETE a resource
    pub async fn delete(&self, uri: &str) -> Result<String> {
        self.send(Method::Delete, uri, None).await
    }
}

fn check_json_body(method: Method, body: &str) -> Result<()> {
    if body.is_empty() || serde_json::from_str::<Value>(body).is_ok() {
        return Ok(());
    }
    Err(ClientError::Request {
        status: INVALID_BODY_STATUS,
        message: format!("{} request got invalid JSON body: {}", method.as_str(), body),
    })
}

/// Look up a nested key
///
/// Array elements are addressed by their decimal index.
pub fn json_path<'a>(value: &'a Value, keys: &[&str]) -> Result<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| match current {
            Value::Object(map) => map.get(*key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .ok_or_else(|| ClientError::MissingKey(keys.join(" ")))
}
