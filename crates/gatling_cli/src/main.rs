//! Gatling CLI — the command-line interface for the Gatling logic toolchain.
//!
//! Provides `gatling compile` for expanding macro HDL into flat netlists
//! (mnemonic text or the simulator's binary gate files) and `gatling sim`
//! for running a compiled netlist with the virtual UART attached to the
//! real terminal.

#![warn(missing_docs)]

mod compile;
mod sim;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Gatling — a NAND/OR macro-logic compiler and simulator.
#[derive(Parser, Debug)]
#[command(name = "gatling", version, about = "Gatling logic toolchain")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Expand macro source into a flat gate netlist.
    Compile(CompileArgs),
    /// Simulate compiled gate files.
    Sim(SimArgs),
}

/// Arguments for the `gatling compile` subcommand.
#[derive(Parser, Debug)]
pub struct CompileArgs {
    /// Macro source file. Reads stdin when omitted.
    pub source: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = EmitFormat::Binary)]
    pub emit: EmitFormat,

    /// Output path. For binary emission this is the NAND gate file
    /// (default `out.nand`); for text it defaults to stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// OR gate file path for binary emission (default `out.or`).
    #[arg(long)]
    pub or_output: Option<String>,
}

/// Arguments for the `gatling sim` subcommand.
#[derive(Parser, Debug)]
pub struct SimArgs {
    /// NAND gate file.
    pub nand_file: String,

    /// OR gate file (optional; no OR gates when omitted).
    pub or_file: Option<String>,

    /// Fixed RNG seed for the initial wire noise (default: from entropy,
    /// echoed to stderr either way).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many steps even without shutdown.
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Path to a `gatling.toml` configuration file.
    #[arg(long)]
    pub config: Option<String>,
}

/// Netlist output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EmitFormat {
    /// Binary gate files for the simulator.
    Binary,
    /// Mnemonic text, one primitive instantiation per line.
    Text,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
    };

    let result = match cli.command {
        Command::Compile(ref args) => compile::run(args, &global),
        Command::Sim(ref args) => sim::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection: checks the TERM env var.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}
