//! Breeze CLI - Tailwind CSS integration for server-rendered Rust web apps.
//!
//! Entry point: parses arguments, initializes logging, and dispatches to the
//! requested command.

use breeze_cli::{cli, commands, error, logger};
use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match args.command {
        Some(cli::Command::Build(build_args)) => commands::build_execute(build_args).await,
        Some(cli::Command::Install(install_args)) => commands::install_execute(install_args).await,
        None => commands::build_execute(cli::BuildArgs::default()).await,
    };

    result.map_err(error::to_report)
}
