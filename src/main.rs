mod cli;
mod config;
mod convert;
mod convert_cmd;
mod info_cmd;
mod logging;
mod query_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Convert(args) => convert_cmd::run(args),
        Command::List(args) => info_cmd::run_list(args),
        Command::Info(args) => info_cmd::run_info(args),
        Command::Query(args) => query_cmd::run(args),
    }
}
