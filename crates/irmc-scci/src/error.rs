//! Error types for SCCI encoding and decoding

use thiserror::Error;

/// A logical value that has no entry in its value map
///
/// The display text is the placeholder written to the wire in place of the
/// missing key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no key for value '{value}' in '{map}'")]
pub struct CodecError {
    /// The value that failed to encode
    pub value: String,
    /// Rendered value map the lookup was made against
    pub map: String,
}

/// Error type for SCCI operations
#[derive(Debug, Error)]
pub enum ScciError {
    /// One or more values could not be encoded
    #[error("{} value(s) could not be encoded: {}", .0.len(), join_codec_errors(.0))]
    Codec(Vec<CodecError>),

    /// A document is not well-formed XML
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// A result code element did not hold a number
    #[error("invalid result code '{0}'")]
    InvalidResultCode(String),

    /// A command needs a data payload that was not supplied
    #[error("SCCI {0} command requires data")]
    MissingData(&'static str),

    /// Unknown raw command name
    #[error("unknown SCCI command '{0}'")]
    UnknownCommand(String),
}

fn join_codec_errors(errors: &[CodecError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for SCCI operations
pub type Result<T> = std::result::Result<T, ScciError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display() {
        let err = CodecError {
            value: "Maybe".to_string(),
            map: "{'0': 'False', '1': 'True'}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no key for value 'Maybe' in '{'0': 'False', '1': 'True'}'"
        );
    }

    #[test]
    fn test_scci_error_display() {
        let err = ScciError::MissingData("set_cs");
        assert_eq!(err.to_string(), "SCCI set_cs command requires data");

        let err = ScciError::Codec(vec![
            CodecError {
                value: "a".to_string(),
                map: "{}".to_string(),
            },
            CodecError {
                value: "b".to_string(),
                map: "{}".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "2 value(s) could not be encoded: no key for value 'a' in '{}'; no key for value 'b' in '{}'"
        );
    }
}
