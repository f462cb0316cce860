#![warn(clippy::pedantic)]

//! # schemalink CLI
//!
//! Command line interface for converting data model instances.
//!
//! ## Subcommands
//!
//! - `convert` - project a JSON instance onto destination classes and print
//!   the result as `{RootClassName: data}`
//! - `template` - write a skeleton link template for a source model
//!
//! ## Logging
//!
//! Diagnostics go to stderr. The default level is `warn`; each `-v` raises it
//! by one step. `RUST_LOG` overrides the verbosity flags.
//!
//! ## Exit codes
//! * 0 – success.
//! * 1 – usage / IO / conversion failure.
//!
//! ## Example
//! ```bash
//! schemalink convert --schemas schemas/ --model libSrc.Measurement --input data.json --option A
//! ```

mod commands;
mod parser;

use anyhow::Result;
use clap::Parser;
use parser::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Convert(args) => commands::convert::execute(args),
        Commands::Template(args) => commands::template::execute(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}
