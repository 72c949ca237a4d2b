//! Subcommands

use std::process::ExitCode;

use clap::Args;
use irmc_client::{ClientConfig, ClientError};
use tracing::error;

pub mod compare;
pub mod power;
pub mod scci;
pub mod session;

/// Connection options shared by every command that talks to an iRMC
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// iRMC host name or address
    #[arg(long, env = "IRMC_URL")]
    pub host: String,

    /// iRMC user
    #[arg(long, env = "IRMC_USERNAME")]
    pub username: String,

    /// iRMC password
    #[arg(long, env = "IRMC_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub no_verify: bool,
}

impl ConnectionArgs {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.host, &self.username, &self.password)
            .with_validate_certs(!self.no_verify)
    }
}

/// Map a status to a process exit code
pub fn exit_status(status: u16) -> ExitCode {
    match u8::try_from(status) {
        Ok(0) | Err(_) => ExitCode::FAILURE,
        Ok(code) => ExitCode::from(code),
    }
}

/// Report a client failure and turn it into an exit code
pub fn fail(err: &ClientError) -> ExitCode {
    error!(status = err.status(), "{}", err);
    eprintln!("Error: {}", err);
    exit_status(err.status())
}

/// Parse a number given in decimal or as `0x` hex
pub fn parse_number(value: &str) -> Result<u16, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0x200"), Ok(0x200));
        assert_eq!(parse_number("0X1A"), Ok(0x1A));
        assert_eq!(parse_number("512"), Ok(512));
        assert!(parse_number("0xZZ").is_err());
        assert!(parse_number("70000").is_err());
    }
}
