//! Raw SCCI requests
//!
//! A single scripting command addressed directly by opcode extension, index
//! and cabinet, for operations that are not driven by a field table: raw
//! ConfigSpace reads/writes and the server power actions.

use std::fmt;
use std::str::FromStr;

use crate::command::{render_command, wrap_envelope, Payload, DEFAULT_CABINET};
use crate::error::{Result, ScciError};

/// Scripting command with its SCCI opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScciCommand {
    /// ConfigSpace read
    GetConfig,
    /// ConfigSpace write
    SetConfig,
    /// Power on the server
    PowerOn,
    /// Power off the server
    PowerOff,
    /// Power cycle the server
    PowerCycle,
    /// Hard reset
    Reset,
    /// Pulse the non-maskable interrupt
    Nmi,
    /// Graceful shutdown (requires the server agent)
    GracefulShutdown,
    /// Graceful reboot (requires the server agent)
    GracefulReboot,
    /// Cancel a pending shutdown request
    CancelShutdown,
    /// Reset the BMC firmware
    ResetFirmware,
    /// Connect or disconnect a remote storage server
    ConnectStorage,
}

impl ScciCommand {
    /// All commands, in documentation order
    pub const ALL: [ScciCommand; 12] = [
        ScciCommand::GetConfig,
        ScciCommand::SetConfig,
        ScciCommand::PowerOn,
        ScciCommand::PowerOff,
        ScciCommand::PowerCycle,
        ScciCommand::Reset,
        ScciCommand::Nmi,
        ScciCommand::GracefulShutdown,
        ScciCommand::GracefulReboot,
        ScciCommand::CancelShutdown,
        ScciCommand::ResetFirmware,
        ScciCommand::ConnectStorage,
    ];

    /// SCCI opcode (`OC` attribute)
    pub fn opcode(&self) -> &'static str {
        match self {
            ScciCommand::GetConfig => "E001",
            ScciCommand::SetConfig => "E002",
            ScciCommand::PowerOn => "0111",
            ScciCommand::PowerOff => "0112",
            ScciCommand::PowerCycle => "0113",
            ScciCommand::Reset => "0204",
            ScciCommand::Nmi => "020C",
            ScciCommand::GracefulShutdown => "0205",
            ScciCommand::GracefulReboot => "0206",
            ScciCommand::CancelShutdown => "0209",
            ScciCommand::ResetFirmware => "0203",
            ScciCommand::ConnectStorage => "0250",
        }
    }

    /// Command name as used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            ScciCommand::GetConfig => "get_cs",
            ScciCommand::SetConfig => "set_cs",
            ScciCommand::PowerOn => "power_on",
            ScciCommand::PowerOff => "power_off",
            ScciCommand::PowerCycle => "power_cycle",
            ScciCommand::Reset => "reset",
            ScciCommand::Nmi => "nmi",
            ScciCommand::GracefulShutdown => "graceful_shutdown",
            ScciCommand::GracefulReboot => "graceful_reboot",
            ScciCommand::CancelShutdown => "cancel_shutdown",
            ScciCommand::ResetFirmware => "reset_firmware",
            ScciCommand::ConnectStorage => "connect_storage",
        }
    }

    /// Whether the command only reads
    pub fn is_read(&self) -> bool {
        matches!(self, ScciCommand::GetConfig)
    }
}

impl fmt::Display for ScciCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScciCommand {
    type Err = ScciError;

    fn from_str(s: &str) -> Result<Self> {
        ScciCommand::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| ScciError::UnknownCommand(s.to_string()))
    }
}

/// A single raw scripting command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScciRequest {
    /// The command
    pub command: ScciCommand,
    /// Opcode extension (`OE`)
    pub opcode_ext: u16,
    /// Instance index (`OI`)
    pub index: u16,
    /// Cabinet (`CA`), -1 for the default cabinet
    pub cabinet: i32,
    /// Data for `set_cs`
    pub data: Option<String>,
}

impl ScciRequest {
    /// Create a request for the default cabinet and index 0
    pub fn new(command: ScciCommand, opcode_ext: u16) -> Self {
        Self {
            command,
            opcode_ext,
            index: 0,
            cabinet: DEFAULT_CABINET,
            data: None,
        }
    }

    /// Set the instance index
    pub fn with_index(mut self, index: u16) -> Self {
        self.index = index;
        self
    }

    /// Set the cabinet
    pub fn with_cabinet(mut self, cabinet: i32) -> Self {
        self.cabinet = cabinet;
        self
    }

    /// Set the data payload
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Render the request document
    pub fn render(&self) -> Result<String> {
        let (keyword, payload) = match self.command {
            ScciCommand::GetConfig => ("GET", None),
            ScciCommand::SetConfig => {
                let data = self
                    .data
                    .as_deref()
                    .ok_or(ScciError::MissingData("set_cs"))?;
                ("SET", Some(Payload::inferred(data)))
            }
            _ => ("SET", None),
        };
        Ok(wrap_envelope(render_command(
            self.command.opcode(),
            self.opcode_ext,
            self.index,
            self.cabinet,
            keyword,
            payload.as_ref(),
        )))
    }
}
