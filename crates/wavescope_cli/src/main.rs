//! wavescope CLI — terminal inspector for VCD traces.
//!
//! Provides `wavescope info` for header metadata and summary counts,
//! `wavescope tree` for the scope hierarchy, and `wavescope signals` for
//! the variables declared directly in one scope. All commands read the
//! trace through the projection models, the same surface a graphical
//! front end would use.

#![warn(missing_docs)]

mod info;
mod signals;
mod tree;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// wavescope — inspect VCD simulation traces.
#[derive(Parser, Debug)]
#[command(name = "wavescope", version, about = "VCD trace inspector")]
pub struct Cli {
    /// Suppress status output on stderr.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show header metadata and summary counts.
    Info(InfoArgs),
    /// Print the scope hierarchy.
    Tree(TreeArgs),
    /// List the variables declared directly in one scope.
    Signals(SignalsArgs),
}

/// Arguments for the `wavescope info` subcommand.
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to the VCD file.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `wavescope tree` subcommand.
#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Path to the VCD file.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `wavescope signals` subcommand.
#[derive(Parser, Debug)]
pub struct SignalsArgs {
    /// Path to the VCD file.
    pub file: PathBuf,

    /// Dot-joined scope path (e.g. `top.core`); empty selects the root.
    #[arg(default_value = "")]
    pub scope: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Info(ref args) => info::run(args, cli.quiet),
        Command::Tree(ref args) => tree::run(args, cli.quiet),
        Command::Signals(ref args) => signals::run(args, cli.quiet),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
