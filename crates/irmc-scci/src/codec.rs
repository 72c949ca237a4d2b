//! Value codec
//!
//! SCCI carries enumerated settings as numeric string keys ("0", "1", ...).
//! A [`ValueMap`] translates between those wire keys and the labels callers
//! work with ("False", "Administrator", ...).

use std::fmt;

use crate::error::CodecError;

/// Ordered mapping from wire key to logical label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueMap {
    entries: &'static [(&'static str, &'static str)],
}

/// The boolean map shared by every on/off setting
pub const TRUE_FALSE: ValueMap = ValueMap::new(&[("0", "False"), ("1", "True")]);

impl ValueMap {
    /// Create a map from `(wire key, label)` pairs
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Iterate over `(wire key, label)` pairs in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// Find the wire key for a label (case-insensitive)
    ///
    /// An empty label encodes to an empty key.
    pub fn encode(&self, label: &str) -> Result<&'static str, CodecError> {
        if label.is_empty() {
            return Ok("");
        }
        let folded = label.to_lowercase();
        self.entries
            .iter()
            .find(|(_, candidate)| candidate.to_lowercase() == folded)
            .map(|(key, _)| *key)
            .ok_or_else(|| CodecError {
                value: label.to_string(),
                map: self.to_string(),
            })
    }

    /// Encode, substituting the "no key for value" placeholder on failure
    ///
    /// This is the wire-compatible form. Callers that need to know about the
    /// failure should use [`ValueMap::encode`].
    pub fn encode_or_placeholder(&self, label: Option<&str>) -> String {
        match label {
            None => String::new(),
            Some(label) => match self.encode(label) {
                Ok(key) => key.to_string(),
                Err(err) => err.to_string(),
            },
        }
    }

    /// Find the label for a wire key
    pub fn decode(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, label)| *label)
    }
}

impl fmt::Display for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, label)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': '{}'", key, label)?;
        }
        write!(f, "}}")
    }
}

/// Wire type of a `DATA` payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadType {
    /// `xsd::integer`
    Integer,
    /// `xsd::string`
    String,
}

impl PayloadType {
    /// Infer the type of a pass-through value
    ///
    /// Non-empty, all-ASCII-digit text is an integer; everything else is a string.
    pub fn infer(value: &str) -> Self {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            PayloadType::Integer
        } else {
            PayloadType::String
        }
    }

    /// Value of the `Type` attribute
    pub fn as_xsd(&self) -> &'static str {
        match self {
            PayloadType::Integer => "xsd::integer",
            PayloadType::String => "xsd::string",
        }
    }
}

/// Wire form of a boolean without a value map
pub fn bool_to_wire(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVILEGE: ValueMap = ValueMap::new(&[
        ("0", "Reserved"),
        ("1", "Callback"),
        ("2", "User"),
        ("3", "Operator"),
        ("4", "Administrator"),
        ("5", "OEM"),
        ("15", "No Access"),
    ]);

    #[test]
    fn test_encode_is_case_insensitive() {
        assert_eq!(TRUE_FALSE.encode("true").unwrap(), "1");
        assert_eq!(TRUE_FALSE.encode("FALSE").unwrap(), "0");
        assert_eq!(PRIVILEGE.encode("no access").unwrap(), "15");
    }

    #[test]
    fn test_encode_folds_non_ascii_labels() {
        const SIZES: ValueMap = ValueMap::new(&[("0", "Größe"), ("1", "Ändern")]);
        assert_eq!(SIZES.encode("ändern").unwrap(), "1");
        assert!(SIZES.encode("GRÖSSE").is_err());
        assert_eq!(SIZES.encode("GRÖßE").unwrap(), "0");
    }

    #[test]
    fn test_encode_empty_and_missing() {
        assert_eq!(TRUE_FALSE.encode("").unwrap(), "");
        assert_eq!(TRUE_FALSE.encode_or_placeholder(None), "");
        assert_eq!(TRUE_FALSE.encode_or_placeholder(Some("True")), "1");
    }

    #[test]
    fn test_encode_unknown_label() {
        let err = TRUE_FALSE.encode("Maybe").unwrap_err();
        assert_eq!(err.value, "Maybe");
        assert_eq!(
            TRUE_FALSE.encode_or_placeholder(Some("Maybe")),
            "no key for value 'Maybe' in '{'0': 'False', '1': 'True'}'"
        );
    }

    #[test]
    fn test_decode() {
        assert_eq!(TRUE_FALSE.decode("1"), Some("True"));
        assert_eq!(PRIVILEGE.decode("15"), Some("No Access"));
        assert_eq!(PRIVILEGE.decode("9"), None);
    }

    #[test]
    fn test_every_pair_round_trips() {
        for map in [TRUE_FALSE, PRIVILEGE] {
            for (key, label) in map.entries() {
                assert_eq!(map.decode(map.encode(label).unwrap()), Some(label));
                assert_eq!(map.encode(map.decode(key).unwrap()).unwrap(), key);
            }
        }
    }

    #[test]
    fn test_payload_type_inference() {
        assert_eq!(PayloadType::infer("123"), PayloadType::Integer);
        assert_eq!(PayloadType::infer(""), PayloadType::String);
        assert_eq!(PayloadType::infer("-1"), PayloadType::String);
        assert_eq!(PayloadType::infer("ntp.example.com"), PayloadType::String);
        assert_eq!(PayloadType::Integer.as_xsd(), "xsd::integer");
    }

    #[test]
    fn test_bool_to_wire() {
        assert_eq!(bool_to_wire(true), "1");
        assert_eq!(bool_to_wire(false), "0");
    }
}
