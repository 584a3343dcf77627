//! `talkstore` command-line adapter.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the catalog once.
//! - Dispatch one subcommand against the shared store and print JSON.

mod cli;
mod commands;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::Cli;
use log::info;
use std::process::ExitCode;
use talkstore_core::{init_logging, TalkStore};

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging(cli.config.effective_log_level(), cli.config.log_dir.as_deref())
        .map_err(|err| anyhow!(err))
        .context("cannot start logging")?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        talkstore_core::core_version()
    );

    let store = TalkStore::open(&cli.config.db_path)
        .with_context(|| format!("cannot open catalog `{}`", cli.config.db_path.display()))?;
    commands::run(&store, cli.command)
}
