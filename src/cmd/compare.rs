use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use color_eyre::eyre::Result;
use irmc_profile::{compare, load, ProfileSlot};
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First profile as inline JSON
    #[arg(long)]
    pub profile_json1: Option<String>,

    /// Path to the first profile (ignored if --profile-json1 is set)
    #[arg(long)]
    pub profile_path1: Option<PathBuf>,

    /// Second profile as inline JSON
    #[arg(long)]
    pub profile_json2: Option<String>,

    /// Path to the second profile (ignored if --profile-json2 is set)
    #[arg(long)]
    pub profile_path2: Option<PathBuf>,
}

/// Compare two profiles and print the result as JSON
pub fn run(args: CompareArgs) -> Result<ExitCode> {
    let profiles = load(
        ProfileSlot::First,
        args.profile_json1.as_deref(),
        args.profile_path1.as_deref(),
    )
    .and_then(|first| {
        let second = load(
            ProfileSlot::Second,
            args.profile_json2.as_deref(),
            args.profile_path2.as_deref(),
        )?;
        Ok((first, second))
    });

    let (first, second) = match profiles {
        Ok(profiles) => profiles,
        Err(e) => {
            error!(status = e.status(), "{}", e);
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(e.status()));
        }
    };

    let comparison = compare(&first, &second);
    info!(
        equal = comparison.equal,
        differences = comparison.differences.len(),
        "profiles compared"
    );
    println!("{}", serde_json::to_string_pretty(&comparison)?);
    Ok(ExitCode::SUCCESS)
}
