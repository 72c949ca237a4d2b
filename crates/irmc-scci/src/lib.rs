//! iRMC SCCI codec
//!
//! This crate encodes configuration settings into SCCI command sequences and
//! decodes the device's XML answers back into per-field results. It does no
//! I/O; see `irmc-client` for the HTTP side.
//!
//! # Field tables
//!
//! Every module that talks SCCI declares its settings once, as a static
//! table:
//!
//! ```
//! use irmc_scci::{FieldDescriptor, ValueMap, TRUE_FALSE};
//!
//! static RTC_MODE: ValueMap = ValueMap::new(&[("0", "local time"), ("1", "UTC/GMT")]);
//!
//! static TABLE: &[FieldDescriptor] = &[
//!     FieldDescriptor::new("rtc_mode", "ConfBmcRtcMode", 0x00B6, 0).with_map(&RTC_MODE),
//!     FieldDescriptor::new("ntp_server_primary", "ConfBmcNtpServer", 0x00B3, 0),
//!     FieldDescriptor::new("ntp_server_secondary", "ConfBmcNtpServer", 0x00B3, 1),
//!     FieldDescriptor::new("ldap_enabled", "ConfBMCLDAPEnable", 0x1971, 0).with_map(&TRUE_FALSE),
//! ];
//! # let _ = TABLE;
//! ```
//!
//! # Round trip
//!
//! ```
//! use irmc_scci::{build, parse_many, FieldDescriptor, Operation, Settings};
//!
//! static TABLE: &[FieldDescriptor] = &[
//!     FieldDescriptor::new("ntp_server_primary", "ConfBmcNtpServer", 0x00B3, 0),
//! ];
//!
//! let mut settings = Settings::new();
//! settings.set("ntp_server_primary", "ntp1.example.com");
//! let request = build(Operation::Set, &settings, TABLE);
//! assert!(request.body().contains(r#"OE="B3""#));
//!
//! let response = r#"<Status><Value>0</Value><CMD OE="B3" OI="0"><DATA>ntp1.example.com</DATA><STATUS>0</STATUS></CMD></Status>"#;
//! let mut values = Settings::requesting(TABLE);
//! let summary = parse_many(response, &mut values, TABLE);
//! assert!(summary.is_success());
//! assert_eq!(values.get_text("ntp_server_primary").as_deref(), Some("ntp1.example.com"));
//! ```

pub mod codec;
pub mod command;
pub mod error;
pub mod field;
pub mod request;
pub mod response;

pub use codec::{PayloadType, ValueMap, TRUE_FALSE};
pub use command::{build, validate, CommandBuilder, CommandDocument, Operation, Payload};
pub use error::{CodecError, Result, ScciError};
pub use field::{find_field, lookup_opcode, FieldDescriptor, SettingValue, Settings};
pub use request::{ScciCommand, ScciRequest};
pub use response::{
    parse_many, parse_many_by_slot, parse_one, parse_one_at, ListResult, ScciResult,
    MALFORMED_RESPONSE,
};
