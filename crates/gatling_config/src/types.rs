//! Configuration data types for the simulator.

use serde::{Deserialize, Serialize};

/// Default number of steps RESET is asserted and SHUTDOWN must be held.
pub const DEFAULT_RESET_PERIOD: u64 = 64;
/// Default length in steps of one full CLOCK period.
pub const DEFAULT_CLOCK_PERIOD: u64 = 16;
/// Default number of steps before the UART reasserts output-ready.
pub const DEFAULT_UART_CLOCK_PERIOD: u64 = 1024;

/// Top-level configuration file structure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// The `[sim]` table.
    #[serde(default)]
    pub sim: SimConfig,
}

/// Simulator timing and seeding configuration.
///
/// All fields have compiled-in defaults so an empty or absent `gatling.toml`
/// yields a fully usable configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimConfig {
    /// Steps RESET stays asserted from simulation start; also the number of
    /// consecutive steps SHUTDOWN must be held high to stop the run.
    #[serde(default = "default_reset_period")]
    pub reset_period: u64,
    /// Steps per full CLOCK square-wave period (low half, then high half).
    #[serde(default = "default_clock_period")]
    pub clock_period: u64,
    /// Steps after an output-clock pulse before OQ reasserts.
    #[serde(default = "default_uart_clock_period")]
    pub uart_clock_period: u64,
    /// Fixed RNG seed for the initial wire-state noise. When absent, a seed
    /// is drawn from entropy and echoed to stderr.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            reset_period: DEFAULT_RESET_PERIOD,
            clock_period: DEFAULT_CLOCK_PERIOD,
            uart_clock_period: DEFAULT_UART_CLOCK_PERIOD,
            seed: None,
        }
    }
}

fn default_reset_period() -> u64 {
    DEFAULT_RESET_PERIOD
}

fn default_clock_period() -> u64 {
    DEFAULT_CLOCK_PERIOD
}

fn default_uart_clock_period() -> u64 {
    DEFAULT_UART_CLOCK_PERIOD
}
