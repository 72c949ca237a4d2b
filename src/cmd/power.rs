use std::process::ExitCode;

use clap::{Args, Subcommand};
use color_eyre::eyre::Result;
use irmc_client::{BmcController, IrmcController, ResetType};
use tracing::info;

use super::{fail, ConnectionArgs};

#[derive(Args, Debug)]
pub struct PowerArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub action: PowerAction,
}

#[derive(Subcommand, Debug)]
pub enum PowerAction {
    /// Print the current power state
    Get,
    /// Apply an OEM reset (PowerOn, PowerOff, PowerCycle, GracefulPowerOff,
    /// ImmediateReset, GracefulReset, PulseNmi, PressPowerButton)
    Set {
        #[arg(value_parser = parse_reset)]
        state: ResetType,
    },
    /// Power on through SCCI
    On,
    /// Hard power off through SCCI
    Off,
    /// Power cycle through SCCI
    Cycle,
    /// Hard reset through SCCI
    Reset,
    /// Graceful shutdown through SCCI
    Shutdown,
    /// Graceful reboot through SCCI
    Reboot,
}

fn parse_reset(value: &str) -> Result<ResetType, String> {
    value.parse()
}

/// Run a power action
pub async fn run(args: PowerArgs) -> Result<ExitCode> {
    let controller = IrmcController::new(args.connection.config())?;

    let outcome = match args.action {
        PowerAction::Get => controller.get_power_state().await.map(|state| {
            println!("{}", state);
        }),
        PowerAction::Set { state } => controller.set_power_state(state).await.map(|changed| {
            if !changed {
                println!("Server is already in state '{}'", state);
            }
        }),
        PowerAction::On => controller.power_on().await,
        PowerAction::Off => controller.power_off().await,
        PowerAction::Cycle => controller.power_cycle().await,
        PowerAction::Reset => controller.reset().await,
        PowerAction::Shutdown => controller.graceful_shutdown().await,
        PowerAction::Reboot => controller.graceful_reboot().await,
    };

    match outcome {
        Ok(()) => {
            info!("power action complete");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(fail(&e)),
    }
}
