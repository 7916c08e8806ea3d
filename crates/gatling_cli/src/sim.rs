//! The `gatling sim` subcommand: run compiled gate files.

use std::io;
use std::path::Path;

use gatling_config::{load_config, SimConfig};
use gatling_sim::{host, load_image, Driver, StopCause, TerminalHost};

use crate::{GlobalArgs, SimArgs};

/// Runs the sim subcommand, returning the process exit code.
///
/// Exit 0 on clean shutdown (or the step bound), 1 on load or hardware
/// failure. The terminal is restored on every path: the host's drop
/// handles normal and error returns, the panic hook covers the rest.
pub fn run(args: &SimArgs, global: &GlobalArgs) -> Result<i32, io::Error> {
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    let image = match load_image(
        Some(Path::new(&args.nand_file)),
        args.or_file.as_deref().map(Path::new),
    ) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(1);
        }
    };

    if global.verbose && !global.quiet {
        eprintln!(
            "loaded {} nand + {} or gates over {} wires",
            image.nands.len(),
            image.ors.len(),
            image.num_wires
        );
    }

    // CLI flag beats config file beats entropy; echoed for reproducibility.
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    if !global.quiet {
        eprintln!("seed: {seed}");
    }

    host::install_panic_hook();
    let terminal = TerminalHost::new()?;
    let mut driver = Driver::new(image, &config, seed, terminal);

    match driver.run(args.max_steps) {
        Ok(summary) => {
            if !global.quiet {
                match summary.cause {
                    StopCause::Shutdown => {
                        eprintln!("clean shutdown after {} steps", summary.steps)
                    }
                    StopCause::MaxSteps => {
                        eprintln!("step bound reached after {} steps", summary.steps)
                    }
                }
            }
            Ok(0)
        }
        Err(e) => {
            // Drop the driver first so raw mode is off before we print.
            drop(driver);
            eprintln!("error: {e}");
            Ok(1)
        }
    }
}

/// Loads timing configuration: `--config` path, else `./gatling.toml` if
/// present, else compiled-in defaults.
fn resolve_config(args: &SimArgs) -> Result<SimConfig, gatling_config::ConfigError> {
    match &args.config {
        Some(path) => load_config(Path::new(path)),
        None => {
            let default_path = Path::new("gatling.toml");
            if default_path.exists() {
                load_config(default_path)
            } else {
                Ok(SimConfig::default())
            }
        }
    }
}
