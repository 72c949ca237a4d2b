//! SCCI response parser
//!
//! The iRMC answers a command sequence with a document like:
//!
//! ```text
//! <Status>
//!   <Value>0</Value>
//!   <Severity>Information</Severity>
//!   <Message>No Error</Message>
//!   <CMD Context="SCCI" OC="ConfigSpace" OE="1941" OI="0" Type="GET">
//!     <DATA Type="xsd::integer">1</DATA>
//!     <STATUS>0</STATUS>
//!   </CMD>
//! </Status>
//! ```
//!
//! Results are correlated back to fields by opcode extension (`OE`). The
//! returned document is not always well-formed, so parse failures become a
//! result code instead of an error.

use std::error::Error as StdError;

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::error::ScciError;
use crate::field::{FieldDescriptor, Settings};

/// Result code reported when the response is not well-formed XML
pub const MALFORMED_RESPONSE: i64 = 95;

/// SSH key and certificate slots of a user account
///
/// An empty slot is reported by the device with [`EMPTY_SLOT_CODE`].
const OPTIONAL_KEY_OPCODES: [u16; 3] = [0x19A1, 0x19A2, 0x19A3];

/// Device result code for an empty key slot
const EMPTY_SLOT_CODE: i64 = 1;

/// Outcome for one opcode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScciResult {
    /// Value returned by the device, or the error text on failure
    pub data: String,
    /// 0 on success
    pub code: i64,
    /// Error or warning text
    pub context: String,
}

impl ScciResult {
    /// Whether the device reported success
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Aggregate outcome over a field table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    /// Sum of all non-zero field codes
    pub code: i64,
    /// Contexts of failing fields, one per line
    pub context: String,
}

impl ListResult {
    /// Whether every field succeeded
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Upper-cased local name of an element
fn tag(node: Node<'_, '_>) -> String {
    node.tag_name().name().to_ascii_uppercase()
}

/// Attribute value, matching the name case-insensitively
fn attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attr| attr.name().eq_ignore_ascii_case(name))
        .map(|attr| attr.value())
}

fn text(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().to_string()
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

fn hex_attribute_is(node: Node<'_, '_>, name: &str, expected: u16) -> bool {
    attribute(node, name)
        .and_then(|value| u16::from_str_radix(value.trim(), 16).ok())
        .is_some_and(|value| value == expected)
}

fn parse_code(node: Node<'_, '_>) -> Result<i64, ScciError> {
    let raw = node.text().unwrap_or_default().trim();
    raw.parse()
        .map_err(|_| ScciError::InvalidResultCode(raw.to_string()))
}

/// Values pulled out of a response before aggregation
#[derive(Debug, Default)]
struct Extracted {
    data: String,
    code: i64,
    context: String,
    overall_code: i64,
    overall_context: String,
}

fn extract(doc: &Document<'_>, opcode: u16, slot: Option<u16>) -> Result<Extracted, ScciError> {
    let mut found = Extracted::default();
    let mut matched = false;
    let mut overall_code = None;
    let mut overall_context = None;

    // Overall VALUE/MESSAGE only count when they precede the matched element
    for item in elements(doc.root_element()) {
        match tag(item).as_str() {
            kind @ ("CMD" | "ERROR" | "WARNING") => {
                if !hex_attribute_is(item, "OE", opcode) {
                    continue;
                }
                if let Some(slot) = slot {
                    if !hex_attribute_is(item, "OI", slot) {
                        continue;
                    }
                }
                matched = true;
                if kind != "CMD" {
                    found.context = text(item);
                }
                for child in elements(item) {
                    match tag(child).as_str() {
                        "DATA" => found.data = text(child),
                        "STATUS" | "VALUE" => found.code = parse_code(child)?,
                        "ERROR" | "WARNING" => found.context = text(child),
                        _ => {}
                    }
                }
                break;
            }
            "VALUE" if overall_code.is_none() => overall_code = Some(parse_code(item)?),
            "MESSAGE" if overall_context.is_none() => overall_context = Some(text(item)),
            _ => {}
        }
    }

    if !matched {
        debug!(opcode = %format!("{opcode:X}"), "no result element for opcode");
    }
    found.overall_code = overall_code.unwrap_or_default();
    found.overall_context = overall_context.unwrap_or_default();
    Ok(found)
}

/// Render an error with its debug form and source chain
fn error_report(err: &dyn StdError) -> String {
    let mut report = format!("{err:?}");
    let mut source = err.source();
    while let Some(cause) = source {
        report.push_str("\nCaused by: ");
        report.push_str(&cause.to_string());
        source = cause.source();
    }
    report
}

fn malformed(err: &ScciError) -> Extracted {
    Extracted {
        data: format!("SCCI result was not correct XML: {err}"),
        code: MALFORMED_RESPONSE,
        context: error_report(err),
        ..Extracted::default()
    }
}

/// Combine field and overall outcomes into one result
fn finish(mut found: Extracted, opcode: u16) -> ScciResult {
    if found.code == EMPTY_SLOT_CODE && OPTIONAL_KEY_OPCODES.contains(&opcode) {
        found.code = 0;
        found.data.clear();
        found.context.clear();
    }

    if found.code != 0 || found.overall_code != 0 {
        if found.data.is_empty() {
            found.data = found.context.clone();
        }
        found.code += found.overall_code;
        if found.context.is_empty() {
            found.context = found.overall_context;
        } else {
            found.context = format!("OpCodeExt 0x{:X}: {} ({})", opcode, found.context, found.code);
        }
    }

    ScciResult {
        data: found.data,
        code: found.code,
        context: found.context,
    }
}

fn result_for(
    doc: &Result<Document<'_>, ScciError>,
    opcode: u16,
    slot: Option<u16>,
) -> ScciResult {
    let found = match doc {
        Ok(doc) => extract(doc, opcode, slot).unwrap_or_else(|err| malformed(&err)),
        Err(err) => malformed(err),
    };
    finish(found, opcode)
}

fn parse_document(body: &str) -> Result<Document<'_>, ScciError> {
    Document::parse(body).map_err(|err| {
        warn!(error = %err, "SCCI response is not well-formed XML");
        ScciError::from(err)
    })
}

/// Extract the result for one opcode
///
/// The first `CMD`, `ERROR` or `WARNING` element with a matching `OE` wins.
pub fn parse_one(body: &str, opcode: u16) -> ScciResult {
    result_for(&parse_document(body), opcode, None)
}

/// Extract the result for one opcode at a specific slot (`OI`)
pub fn parse_one_at(body: &str, opcode: u16, slot: u16) -> ScciResult {
    result_for(&parse_document(body), opcode, Some(slot))
}

/// Extract results for every field in a table
///
/// Each field's data is written into `settings` under its logical name.
/// All fields are attempted even when some fail.
pub fn parse_many(body: &str, settings: &mut Settings, table: &[FieldDescriptor]) -> ListResult {
    collect(body, settings, table, false)
}

/// Like [`parse_many`], but also matching each field's slot
///
/// Use this for tables where several fields share one opcode.
pub fn parse_many_by_slot(
    body: &str,
    settings: &mut Settings,
    table: &[FieldDescriptor],
) -> ListResult {
    collect(body, settings, table, true)
}

fn collect(
    body: &str,
    settings: &mut Settings,
    table: &[FieldDescriptor],
    by_slot: bool,
) -> ListResult {
    let doc = parse_document(body);
    let mut summary = ListResult::default();
    let mut contexts = Vec::new();

    for field in table {
        let result = result_for(&doc, field.opcode, by_slot.then_some(field.slot));
        if result.code != 0 {
            debug!(field = field.name, code = result.code, "SCCI field failed");
            summary.code += result.code;
            if !result.context.is_empty() {
                contexts.push(result.context);
            }
        }
        settings.set(field.name, result.data);
    }

    summary.context = contexts.join("\n");
    summary
}
