//! SCCI client
//!
//! Posts command sequences to the iRMC configuration endpoint and turns the
//! response into per-field results.

use std::sync::Arc;

use irmc_scci::{
    build, parse_many, parse_one, validate, FieldDescriptor, ListResult, Operation, ScciRequest,
    ScciResult, Settings,
};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::transport::{HttpRequest, Method, ReqwestTransport, Transport};
use crate::types::ClientConfig;

/// Status for a request body that is not well-formed
pub const INVALID_BODY_STATUS: u16 = 98;

/// Client for the SCCI configuration endpoint
#[derive(Clone)]
pub struct ScciClient {
    transport: Arc<dyn Transport>,
    url: String,
}

impl std::fmt::Debug for ScciClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScciClient").field("url", &self.url).finish()
    }
}

impl ScciClient {
    /// Create a client using the `reqwest` transport
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(
            config,
            Arc::new(ReqwestTransport::new(config)?),
        ))
    }

    /// Create a client on top of an existing transport
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            url: config.scci_url(),
        }
    }

    /// Post a command document and return the raw response
    pub async fn post(&self, body: &str) -> Result<String> {
        if let Err(e) = validate(body) {
            debug!(error = %e, "refusing to post malformed SCCI document");
            return Err(ClientError::Request {
                status: INVALID_BODY_STATUS,
                message: format!("POST request got invalid XML body: {}", body),
            });
        }

        let request = HttpRequest::new(Method::Post, &self.url).body(body);
        self.transport.send(request).await.into_result()
    }

    /// Read every requested field of `table` into `settings`
    pub async fn get(&self, table: &[FieldDescriptor], settings: &mut Settings) -> Result<ListResult> {
        let document = build(Operation::Get, settings, table);
        let response = self.post(document.body()).await?;
        check_list(parse_many(&response, settings, table))
    }

    /// Write the set fields of `settings`
    ///
    /// Values that a field's value map cannot encode are rejected before
    /// anything is sent.
    pub async fn set(&self, table: &[FieldDescriptor], settings: &Settings) -> Result<ListResult> {
        let body = build(Operation::Set, settings, table).into_strict()?;
        let response = self.post(&body).await?;
        let mut written = settings.clone();
        check_list(parse_many(&response, &mut written, table))
    }

    /// Send a single raw command
    pub async fn execute(&self, request: &ScciRequest) -> Result<ScciResult> {
        let body = request.render()?;
        let response = self.post(&body).await?;
        let result = parse_one(&response, request.opcode_ext);
        if result.is_success() {
            Ok(result)
        } else {
            Err(ClientError::Scci {
                code: result.code,
                context: result.context,
            })
        }
    }
}

fn check_list(result: ListResult) -> Result<ListResult> {
    if result.is_success() {
        Ok(result)
    } else {
        Err(ClientError::Scci {
            code: result.code,
            context: result.context,
        })
    }
}
