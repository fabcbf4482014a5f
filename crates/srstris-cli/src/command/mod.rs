use std::{io, path::PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use srstris_engine::Settings;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use crate::util;

use self::simulate::SimulateArg;

mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v = INFO, -vv = DEBUG, -vvv = TRACE)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a headless game driven by scripted or random key presses
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the default settings as JSON
    DefaultSettings(#[clap(flatten)] DefaultSettingsArg),
}

#[derive(Debug, Clone, clap::Args)]
struct DefaultSettingsArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(level)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::DefaultSettings(arg) => {
            util::write_json(&Settings::default(), arg.output.as_deref())?;
        }
    }
    Ok(())
}
