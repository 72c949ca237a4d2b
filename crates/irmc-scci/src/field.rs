//! Field descriptors and setting values
//!
//! A field table is a `static` slice of [`FieldDescriptor`]s that ties each
//! logical setting name to its SCCI opcode and slot. Callers pass values by
//! logical name in a [`Settings`] map.

use std::collections::BTreeMap;

use crate::codec::ValueMap;

/// Static description of one SCCI setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Logical parameter name used by callers
    pub name: &'static str,
    /// Protocol field name (e.g. `ConfBmcNtpServer`)
    pub wire_name: &'static str,
    /// Opcode extension; `0` marks a placeholder that is never sent
    pub opcode: u16,
    /// Instance index for opcodes that repeat (primary/backup entries)
    pub slot: u16,
    /// Label mapping for enumerated values
    pub value_map: Option<&'static ValueMap>,
}

impl FieldDescriptor {
    /// Describe a free-form setting
    pub const fn new(name: &'static str, wire_name: &'static str, opcode: u16, slot: u16) -> Self {
        Self {
            name,
            wire_name,
            opcode,
            slot,
            value_map: None,
        }
    }

    /// Attach a value map
    pub const fn with_map(mut self, value_map: &'static ValueMap) -> Self {
        self.value_map = Some(value_map);
        self
    }

    /// Translate a raw wire value into its label
    ///
    /// Free-form fields return the raw value unchanged.
    pub fn decode(&self, raw: &str) -> Option<String> {
        match self.value_map {
            Some(map) => map.decode(raw).map(str::to_string),
            None => Some(raw.to_string()),
        }
    }
}

/// Find the descriptor for a logical or wire name
pub fn find_field<'a>(table: &'a [FieldDescriptor], key: &str) -> Option<&'a FieldDescriptor> {
    table
        .iter()
        .find(|field| field.name == key || field.wire_name == key)
}

/// Look up the opcode for a logical or wire name
///
/// Returns `None` when the name is unknown or maps to the `0` placeholder.
pub fn lookup_opcode(table: &[FieldDescriptor], key: &str) -> Option<u16> {
    find_field(table, key)
        .map(|field| field.opcode)
        .filter(|opcode| *opcode != 0)
}

/// A setting value as supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// Boolean, rendered as `"True"`/`"False"` before value-map lookup
    Bool(bool),
    /// Integer
    Integer(i64),
    /// Label or free-form text
    Text(String),
}

impl SettingValue {
    /// Text used for value-map lookup
    pub fn as_label(&self) -> String {
        match self {
            SettingValue::Bool(true) => "True".to_string(),
            SettingValue::Bool(false) => "False".to_string(),
            SettingValue::Integer(n) => n.to_string(),
            SettingValue::Text(s) => s.clone(),
        }
    }

    /// Text sent on the wire for fields without a value map
    pub fn as_wire(&self) -> String {
        match self {
            SettingValue::Bool(b) => crate::codec::bool_to_wire(*b).to_string(),
            SettingValue::Integer(n) => n.to_string(),
            SettingValue::Text(s) => s.clone(),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// Setting values keyed by logical name
///
/// A key with a `None` value is requested but unset: GET still reads it,
/// SET leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, Option<SettingValue>>,
}

impl Settings {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Request every field of a table without values (for GET)
    pub fn requesting(table: &[FieldDescriptor]) -> Self {
        let mut settings = Self::new();
        for field in table {
            settings.unset(field.name);
        }
        settings
    }

    /// Set a value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<SettingValue>) -> &mut Self {
        self.values.insert(name.into(), Some(value.into()));
        self
    }

    /// Mark a name as requested without a value
    pub fn unset(&mut self, name: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), None);
        self
    }

    /// Whether a name is present (with or without a value)
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Value for a name, if present and set
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// Value for a name rendered as text
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.get(name).map(SettingValue::as_label)
    }

    /// Label for a name, decoded through the field's value map
    pub fn decoded(&self, name: &str, table: &[FieldDescriptor]) -> Option<String> {
        let raw = self.get_text(name)?;
        let field = find_field(table, name)?;
        field.decode(&raw)
    }

    /// Number of names present
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no names are present
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over names and values in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&SettingValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}
