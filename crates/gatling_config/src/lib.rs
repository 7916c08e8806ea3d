//! Configuration loading for the Gatling simulator.
//!
//! Simulator timing parameters live in an optional `gatling.toml` file with a
//! `[sim]` table. CLI flags override file values; compiled-in defaults apply
//! when neither is present.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::SimConfig;
