use std::process::ExitCode;

use clap::Args;
use color_eyre::eyre::Result;
use irmc_client::{ClientError, ScciClient};
use irmc_scci::{ScciCommand, ScciRequest};

use super::{exit_status, fail, parse_number, ConnectionArgs};

/// Status reported when `set_cs` is given without data
const MISSING_DATA_STATUS: u16 = 10;

#[derive(Args, Debug)]
pub struct ScciArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Command: get_cs, set_cs, power_on, power_off, power_cycle, reset, nmi,
    /// graceful_shutdown, graceful_reboot, cancel_shutdown, reset_firmware,
    /// connect_storage
    #[arg(long, value_parser = parse_command)]
    pub command: ScciCommand,

    /// Opcode extension, decimal or 0x hex
    #[arg(long, value_parser = parse_number)]
    pub opcodeext: u16,

    /// Instance index
    #[arg(long, default_value_t = 0)]
    pub index: u16,

    /// Cabinet, -1 for the main cabinet
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub cabinet: i32,

    /// Data for set_cs
    #[arg(long)]
    pub data: Option<String>,
}

fn parse_command(value: &str) -> Result<ScciCommand, String> {
    value.parse().map_err(|e: irmc_scci::ScciError| e.to_string())
}

/// Send one raw SCCI command
pub async fn run(args: ScciArgs) -> Result<ExitCode> {
    if args.command == ScciCommand::SetConfig && args.data.is_none() {
        eprintln!("Error: SCCI SET command requires 'data' parameter!");
        return Ok(exit_status(MISSING_DATA_STATUS));
    }

    let mut request = ScciRequest::new(args.command, args.opcodeext)
        .with_index(args.index)
        .with_cabinet(args.cabinet);
    if let Some(data) = args.data {
        request = request.with_data(data);
    }

    let client = ScciClient::new(&args.connection.config())?;
    match client.execute(&request).await {
        Ok(result) => {
            if args.command.is_read() {
                println!("{}", result.data);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ClientError::Scci { code, context }) => {
            eprintln!(
                "Error: SCCI '{}' command was not successful. Return code {}: {}",
                args.command, code, context
            );
            Ok(u16::try_from(code).map_or(ExitCode::FAILURE, exit_status))
        }
        Err(e) => Ok(fail(&e)),
    }
}
