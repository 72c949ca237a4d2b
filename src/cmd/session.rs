use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Subcommand};
use color_eyre::eyre::Result;
use irmc_client::{wait_for_session, RedfishClient};

use super::{exit_status, fail, ConnectionArgs};

#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub action: SessionAction,
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Wait until a session has terminated
    Wait {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Session id
        id: u64,

        /// Seconds between status polls
        #[arg(long, default_value_t = 10)]
        poll_interval: u64,
    },
}

/// Run a session action
pub async fn run(args: SessionArgs) -> Result<ExitCode> {
    match args.action {
        SessionAction::Wait {
            connection,
            id,
            poll_interval,
        } => {
            let config = connection
                .config()
                .with_poll_interval(Duration::from_secs(poll_interval));
            let client = RedfishClient::new(config)?;

            match wait_for_session(&client, id).await {
                Ok(outcome) => {
                    println!("{}", outcome.message);
                    if let Some(log) = &outcome.log {
                        println!("{}", serde_json::to_string_pretty(log)?);
                    }
                    if outcome.is_success() {
                        Ok(ExitCode::SUCCESS)
                    } else {
                        Ok(exit_status(outcome.status))
                    }
                }
                Err(e) => Ok(fail(&e)),
            }
        }
    }
}
