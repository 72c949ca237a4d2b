//! Structural profile comparison
//!
//! Walks two JSON documents in parallel and records every difference it
//! finds, labelled with a path such as `Server.SystemConfig.Bios[2].Name`.
//! The walk never stops early: one pass gives the full drift between an
//! intended and an actual configuration.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Which of the two compared documents something belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first document
    Original,
    /// The second document
    Compared,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => write!(f, "original"),
            Side::Compared => write!(f, "compared"),
        }
    }
}

/// One difference between two documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// Values of different JSON types
    TypeMismatch {
        path: String,
        original: &'static str,
        compared: &'static str,
    },
    /// Leaf values that differ
    ValueMismatch {
        path: String,
        original: String,
        compared: String,
    },
    /// Sequences of different length
    ListLength {
        path: String,
        original: usize,
        compared: usize,
    },
    /// Maps with a different number of keys
    DictLength {
        path: String,
        original: usize,
        compared: usize,
    },
    /// Maps whose key sets differ
    Keys {
        path: String,
        /// Keys only in the original
        missing: Vec<String>,
        /// Keys only in the compared document
        found: Vec<String>,
    },
    /// A sequence element with no counterpart
    OnlyOn { path: String, side: Side },
}

impl Difference {
    /// Path of the node the difference was found at
    pub fn path(&self) -> &str {
        match self {
            Difference::TypeMismatch { path, .. }
            | Difference::ValueMismatch { path, .. }
            | Difference::ListLength { path, .. }
            | Difference::DictLength { path, .. }
            | Difference::Keys { path, .. }
            | Difference::OnlyOn { path, .. } => path,
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::TypeMismatch {
                path,
                original,
                compared,
            } => write!(f, "'{}': type '{}' != type '{}'", path, original, compared),
            Difference::ValueMismatch {
                path,
                original,
                compared,
            } => write!(f, "'{}': '{}' != '{}'", path, original, compared),
            Difference::ListLength {
                path,
                original,
                compared,
            } => write!(f, "'{}': list len '{}' != list len '{}'", path, original, compared),
            Difference::DictLength {
                path,
                original,
                compared,
            } => write!(f, "'{}': dict len '{}' != dict len '{}'", path, original, compared),
            Difference::Keys {
                path,
                missing,
                found,
            } => write!(
                f,
                "'{}': missing keys '{}', found keys '{}'",
                path,
                missing.join(" "),
                found.join(" ")
            ),
            Difference::OnlyOn { path, side } => write!(f, "'{}': only on '{}' side", path, side),
        }
    }
}

impl Serialize for Difference {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of comparing two documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Whether the documents are structurally equal
    #[serde(rename = "comparison_result")]
    pub equal: bool,
    /// Every difference, in discovery order
    #[serde(rename = "comparison_list", skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<Difference>,
}

impl Comparison {
    /// Differences rendered as text
    pub fn messages(&self) -> Vec<String> {
        self.differences.iter().map(ToString::to_string).collect()
    }
}

/// Compare two documents
pub fn compare(original: &Value, compared: &Value) -> Comparison {
    let mut differ = Differ::default();
    differ.value(original, compared, "");
    Comparison {
        equal: differ.differences.is_empty(),
        differences: differ.differences,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

#[derive(Debug, Default)]
struct Differ {
    differences: Vec<Difference>,
}

impl Differ {
    fn value(&mut self, original: &Value, compared: &Value, path: &str) {
        match (original, compared) {
            (Value::Array(a), Value::Array(b)) => self.list(a, b, path),
            (Value::Object(a), Value::Object(b)) => self.dict(a, b, path),
            (a, b) if type_name(a) != type_name(b) => {
                self.differences.push(Difference::TypeMismatch {
                    path: path.to_string(),
                    original: type_name(a),
                    compared: type_name(b),
                });
            }
            (a, b) => {
                if a != b {
                    self.differences.push(Difference::ValueMismatch {
                        path: path.to_string(),
                        original: leaf_text(a),
                        compared: leaf_text(b),
                    });
                }
            }
        }
    }

    fn list(&mut self, original: &[Value], compared: &[Value], path: &str) {
        if original.len() != compared.len() {
            self.differences.push(Difference::ListLength {
                path: path.to_string(),
                original: original.len(),
                compared: compared.len(),
            });
        }

        for (index, (a, b)) in original.iter().zip(compared).enumerate() {
            self.value(a, b, &format!("{}[{}]", path, index));
        }

        let (longer, side) = if original.len() >= compared.len() {
            (original.len(), Side::Original)
        } else {
            (compared.len(), Side::Compared)
        };
        let shorter = original.len().min(compared.len());
        for index in shorter..longer {
            self.differences.push(Difference::OnlyOn {
                path: format!("{}[{}]", path, index),
                side,
            });
        }
    }

    fn dict(&mut self, original: &Map<String, Value>, compared: &Map<String, Value>, path: &str) {
        if original.len() != compared.len() {
            self.differences.push(Difference::DictLength {
                path: path.to_string(),
                original: original.len(),
                compared: compared.len(),
            });
        }

        let original_keys: BTreeSet<&String> = original.keys().collect();
        let compared_keys: BTreeSet<&String> = compared.keys().collect();
        let missing: Vec<String> = original_keys
            .difference(&compared_keys)
            .map(|k| k.to_string())
            .collect();
        let found: Vec<String> = compared_keys
            .difference(&original_keys)
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() || !found.is_empty() {
            self.differences.push(Difference::Keys {
                path: path.to_string(),
                missing,
                found,
            });
        }

        for key in original_keys.intersection(&compared_keys) {
            self.value(&original[key.as_str()], &compared[key.as_str()], &child_path(path, key));
        }
    }
}
