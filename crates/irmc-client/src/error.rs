//! Error types for iRMC client operations

use thiserror::Error;

/// Error type for iRMC client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Setup(#[from] reqwest::Error),

    /// A request did not complete successfully
    ///
    /// `status` is the HTTP status, or one of the local codes below 100
    /// (1 invalid login, 97 bad etag, 98 invalid body, 99 exception).
    #[error("request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// A response body was not the expected JSON
    #[error("invalid JSON response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A key path is absent from a JSON document
    #[error("Key does not exist: '{0}'")]
    MissingKey(String),

    /// The device reported an SCCI failure
    #[error("SCCI command was not successful. Return code {code}: {context}")]
    Scci { code: i64, context: String },

    /// Request encoding failed
    #[error(transparent)]
    Codec(#[from] irmc_scci::ScciError),

    /// The requested state is not offered by the device
    #[error("Invalid parameter '{requested}'. Allowed: {allowed}")]
    Unsupported { requested: String, allowed: String },
}

impl ClientError {
    /// Status code to report for this error
    pub fn status(&self) -> u16 {
        match self {
            ClientError::Request { status, .. } => *status,
            ClientError::Scci { code, .. } => u16::try_from(*code).unwrap_or(u16::MAX),
            ClientError::Unsupported { .. } => 11,
            ClientError::Setup(_) => 99,
            ClientError::InvalidJson(_) | ClientError::MissingKey(_) | ClientError::Codec(_) => 98,
        }
    }
}

/// Result type for iRMC client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Request {
            status: 401,
            message: "GET request was not successful (https://irmc/redfish/v1).".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request failed (401): GET request was not successful (https://irmc/redfish/v1)."
        );
        assert_eq!(err.status(), 401);

        let err = ClientError::MissingKey("Session Status".to_string());
        assert_eq!(err.to_string(), "Key does not exist: 'Session Status'");

        let err = ClientError::Scci {
            code: 5,
            context: "OpCodeExt 0x1941: Read only (5)".to_string(),
        };
        assert_eq!(err.status(), 5);
    }
}
