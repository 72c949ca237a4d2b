//! SCCI command sequence builder
//!
//! Builds the XML document posted to the iRMC `/config` endpoint. Each field
//! in a table becomes one `CMD` element addressed by opcode extension (`OE`)
//! and slot (`OI`):
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8" standalone="yes" ?><CMDSEQ>
//! <CMD Context="SCCI" OC="E002" OE="1971" OI="0" CA="-1" Type="SET"><DATA Type="xsd::string">1</DATA>
//! <STATUS>0</STATUS></CMD>
//! </CMDSEQ>
//! ```

use tracing::{debug, warn};

use crate::codec::PayloadType;
use crate::error::{CodecError, Result, ScciError};
use crate::field::{lookup_opcode, FieldDescriptor, SettingValue, Settings};

/// Document header up to and including the opening `CMDSEQ`
pub const ENVELOPE_START: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?><CMDSEQ>\n";

/// Document footer
pub const ENVELOPE_END: &str = "</CMDSEQ>";

/// Cabinet qualifier for the default cabinet
pub const DEFAULT_CABINET: i32 = -1;

const CDATA_TRIGGERS: [char; 5] = ['&', '<', '>', '"', '\''];

/// Requested operation on a set of fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read values
    Get,
    /// Write values
    Set,
    /// Write values for a new entry (sent as SET)
    Create,
    /// Write deletion markers (sent as SET)
    Delete,
}

impl Operation {
    fn wire(self) -> WireOperation {
        match self {
            Operation::Get => WireOperation::Get,
            Operation::Set | Operation::Create | Operation::Delete => WireOperation::Set,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireOperation {
    Get,
    Set,
}

impl WireOperation {
    /// ConfigSpace read/write opcode
    fn opcode(self) -> &'static str {
        match self {
            WireOperation::Get => "E001",
            WireOperation::Set => "E002",
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            WireOperation::Get => "GET",
            WireOperation::Set => "SET",
        }
    }
}

/// Typed `DATA` payload of a SET command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    text: String,
    kind: PayloadType,
}

impl Payload {
    /// Payload whose type is inferred from its text
    pub fn inferred(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = PayloadType::infer(&text);
        Self { text, kind }
    }

    /// Payload with an explicit type
    pub fn typed(text: impl Into<String>, kind: PayloadType) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Render the `DATA` element
    pub fn render(&self) -> String {
        let body = if self.text.contains(&CDATA_TRIGGERS[..]) {
            format!("<![CDATA[{}]]>", self.text)
        } else {
            self.text.clone()
        };
        format!("<DATA Type=\"{}\">{}</DATA>\n", self.kind.as_xsd(), body)
    }
}

/// Render one `CMD` element
///
/// `oc` is the command opcode (`E001`, `E002`, or a raw action code), `oe`
/// and `oi` are rendered as uppercase hex.
pub(crate) fn render_command(
    oc: &str,
    oe: u16,
    oi: u16,
    cabinet: i32,
    keyword: &str,
    payload: Option<&Payload>,
) -> String {
    let data = payload.map(Payload::render).unwrap_or_default();
    format!(
        "<CMD Context=\"SCCI\" OC=\"{}\" OE=\"{:X}\" OI=\"{:X}\" CA=\"{}\" Type=\"{}\">{}<STATUS>0</STATUS></CMD>\n",
        oc, oe, oi, cabinet, keyword, data
    )
}

/// A finished command sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDocument {
    body: String,
    codec_errors: Vec<CodecError>,
}

impl CommandDocument {
    /// The XML body, including placeholders for values that failed to encode
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Values that had no key in their value map
    pub fn codec_errors(&self) -> &[CodecError] {
        &self.codec_errors
    }

    /// Whether every value encoded
    pub fn is_clean(&self) -> bool {
        self.codec_errors.is_empty()
    }

    /// Take the body, failing if any value did not encode
    pub fn into_strict(self) -> Result<String> {
        if self.codec_errors.is_empty() {
            Ok(self.body)
        } else {
            Err(ScciError::Codec(self.codec_errors))
        }
    }

    /// Take the body regardless of codec errors
    pub fn into_body(self) -> String {
        self.body
    }
}

/// Incremental builder for a command sequence against one field table
#[derive(Debug)]
pub struct CommandBuilder<'a> {
    table: &'a [FieldDescriptor],
    commands: Vec<String>,
    codec_errors: Vec<CodecError>,
}

impl<'a> CommandBuilder<'a> {
    /// Start an empty sequence
    pub fn new(table: &'a [FieldDescriptor]) -> Self {
        Self {
            table,
            commands: Vec::new(),
            codec_errors: Vec::new(),
        }
    }

    /// Add a single command for a logical or wire name
    ///
    /// `data` is the wire value. SET-type operations without data and names
    /// with no opcode in the table add nothing. Returns whether a command
    /// was added.
    pub fn command(&mut self, op: Operation, key: &str, slot: u16, data: Option<&str>) -> bool {
        let Some(opcode) = lookup_opcode(self.table, key) else {
            debug!(key, "no opcode for field, skipping");
            return false;
        };
        self.push(op, opcode, slot, data.map(Payload::inferred))
    }

    /// Add one command per table field present in `settings`
    pub fn settings(&mut self, op: Operation, settings: &Settings) -> &mut Self {
        let table = self.table;
        for field in table {
            if !settings.contains(field.name) {
                continue;
            }
            if field.opcode == 0 {
                debug!(field = field.name, "placeholder field, skipping");
                continue;
            }
            let payload = match op.wire() {
                WireOperation::Get => None,
                WireOperation::Set => settings
                    .get(field.name)
                    .map(|value| self.encode(field, value)),
            };
            self.push(op, field.opcode, field.slot, payload);
        }
        self
    }

    fn encode(&mut self, field: &FieldDescriptor, value: &SettingValue) -> Payload {
        let Some(map) = field.value_map else {
            return Payload::inferred(value.as_wire());
        };
        let key = match map.encode(&value.as_label()) {
            Ok(key) => key.to_string(),
            Err(err) => {
                warn!(field = field.name, error = %err, "value has no wire key");
                let placeholder = err.to_string();
                self.codec_errors.push(err);
                placeholder
            }
        };
        Payload::typed(key, PayloadType::String)
    }

    fn push(&mut self, op: Operation, opcode: u16, slot: u16, payload: Option<Payload>) -> bool {
        let wire = op.wire();
        if wire == WireOperation::Set && payload.is_none() {
            return false;
        }
        let payload = match wire {
            WireOperation::Set => payload,
            WireOperation::Get => None,
        };
        self.commands.push(render_command(
            wire.opcode(),
            opcode,
            slot,
            DEFAULT_CABINET,
            wire.keyword(),
            payload.as_ref(),
        ));
        true
    }

    /// Number of commands added so far
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands were added
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Wrap the commands in the envelope
    pub fn build(self) -> CommandDocument {
        debug!(commands = self.commands.len(), "built SCCI command sequence");
        CommandDocument {
            body: wrap_envelope(self.commands.concat()),
            codec_errors: self.codec_errors,
        }
    }
}

pub(crate) fn wrap_envelope(commands: String) -> String {
    let mut body = String::with_capacity(ENVELOPE_START.len() + commands.len() + ENVELOPE_END.len());
    body.push_str(ENVELOPE_START);
    body.push_str(&commands);
    body.push_str(ENVELOPE_END);
    body
}

/// Build a command sequence for every table field present in `settings`
pub fn build(op: Operation, settings: &Settings, table: &[FieldDescriptor]) -> CommandDocument {
    let mut builder = CommandBuilder::new(table);
    builder.settings(op, settings);
    builder.build()
}

/// Check that a body is well-formed XML before it is sent
pub fn validate(body: &str) -> Result<()> {
    roxmltree::Document::parse(body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ValueMap, TRUE_FALSE};

    static ROLE: ValueMap = ValueMap::new(&[
        ("0", "NoAccess"),
        ("1", "Operator"),
        ("2", "Administrator"),
        ("3", "ReadOnly"),
    ]);

    static TABLE: &[FieldDescriptor] = &[
        FieldDescriptor::new("enabled", "ConfBMCExampleEnable", 0x1941, 0).with_map(&TRUE_FALSE),
        FieldDescriptor::new("role", "ConfBMCExampleRole", 0x1D81, 0).with_map(&ROLE),
        FieldDescriptor::new("primary", "ConfBmcNtpServer", 0x00B3, 0),
        FieldDescriptor::new("secondary", "ConfBmcNtpServer", 0x00B3, 1),
        FieldDescriptor::new("port", "ConfBmcLDAPNonSecurePort", 0x1996, 0),
        FieldDescriptor::new("internal", "", 0, 0),
    ];

    #[test]
    fn test_empty_input_yields_empty_envelope() {
        let doc = build(Operation::Get, &Settings::new(), TABLE);
        assert_eq!(
            doc.body(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?><CMDSEQ>\n</CMDSEQ>"
        );
        assert!(validate(doc.body()).is_ok());
    }

    #[test]
    fn test_set_boolean_through_value_map() {
        let mut settings = Settings::new();
        settings.set("enabled", "True");

        let doc = build(Operation::Set, &settings, TABLE);
        assert!(doc.is_clean());
        assert_eq!(
            doc.body(),
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?><CMDSEQ>\n",
                "<CMD Context=\"SCCI\" OC=\"E002\" OE=\"1941\" OI=\"0\" CA=\"-1\" Type=\"SET\">",
                "<DATA Type=\"xsd::string\">1</DATA>\n<STATUS>0</STATUS></CMD>\n",
                "</CMDSEQ>"
            )
        );
    }

    #[test]
    fn test_set_bool_value() {
        let mut settings = Settings::new();
        settings.set("enabled", false);

        let doc = build(Operation::Set, &settings, TABLE);
        assert!(doc.body().contains("<DATA Type=\"xsd::string\">0</DATA>"));
    }

    #[test]
    fn test_get_has_no_payload() {
        let settings = Settings::requesting(TABLE);
        let doc = build(Operation::Get, &settings, TABLE);
        let body = doc.body();

        assert!(!body.contains("<DATA"));
        assert!(body.contains("OC=\"E001\" OE=\"1941\" OI=\"0\" CA=\"-1\" Type=\"GET\""));
        assert!(body.contains("OE=\"B3\" OI=\"0\""));
        assert!(body.contains("OE=\"B3\" OI=\"1\""));
        assert!(!body.contains("OE=\"0\""));
        assert_eq!(body.matches("<CMD ").count(), 5);
    }

    #[test]
    fn test_set_skips_unset_values() {
        let mut settings = Settings::new();
        settings.set("primary", "ntp1.local").unset("secondary");

        let doc = build(Operation::Set, &settings, TABLE);
        assert_eq!(doc.body().matches("<CMD ").count(), 1);
        assert!(doc.body().contains("ntp1.local"));
    }

    #[test]
    fn test_create_and_delete_are_sent_as_set() {
        let mut settings = Settings::new();
        settings.set("primary", "ntp1.local");

        for op in [Operation::Create, Operation::Delete] {
            let doc = build(op, &settings, TABLE);
            assert!(doc.body().contains("OC=\"E002\""));
            assert!(doc.body().contains("Type=\"SET\""));
        }
    }

    #[test]
    fn test_pass_through_payload_types() {
        let mut settings = Settings::new();
        settings.set("port", 389_i64).set("primary", "ntp1.local");

        let doc = build(Operation::Set, &settings, TABLE);
        assert!(doc.body().contains("<DATA Type=\"xsd::integer\">389</DATA>"));
        assert!(doc.body().contains("<DATA Type=\"xsd::string\">ntp1.local</DATA>"));
    }

    #[test]
    fn test_special_characters_are_wrapped_in_cdata() {
        let mut settings = Settings::new();
        settings.set("primary", "a&b<c");

        let doc = build(Operation::Set, &settings, TABLE);
        assert!(doc
            .body()
            .contains("<DATA Type=\"xsd::string\"><![CDATA[a&b<c]]></DATA>"));
        assert!(validate(doc.body()).is_ok());
    }

    #[test]
    fn test_unmapped_value_is_reported() {
        let mut settings = Settings::new();
        settings.set("role", "Superuser");

        let doc = build(Operation::Set, &settings, TABLE);
        assert!(!doc.is_clean());
        assert_eq!(doc.codec_errors()[0].value, "Superuser");
        assert!(doc.body().contains("no key for value 'Superuser'"));
        assert!(matches!(doc.into_strict(), Err(ScciError::Codec(errors)) if errors.len() == 1));
    }

    #[test]
    fn test_single_command() {
        let mut builder = CommandBuilder::new(TABLE);
        assert!(builder.command(Operation::Delete, "ConfBmcNtpServer", 1, Some("")));
        assert!(!builder.command(Operation::Set, "primary", 0, None));
        assert!(!builder.command(Operation::Get, "unknown", 0, None));
        assert_eq!(builder.len(), 1);

        let doc = builder.build();
        assert!(doc
            .body()
            .contains("OE=\"B3\" OI=\"1\" CA=\"-1\" Type=\"SET\"><DATA Type=\"xsd::string\"></DATA>"));
    }

    #[test]
    fn test_validate_rejects_malformed() {
        assert!(validate("<CMDSEQ><CMD></CMDSEQ>").is_err());
    }
}
