//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{ConfigFile, SimConfig};
use std::path::Path;

/// Loads and validates a `gatling.toml` configuration file.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<SimConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&file.sim)?;
    Ok(file.sim)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &SimConfig) -> Result<(), ConfigError> {
    if config.reset_period == 0 {
        return Err(ConfigError::InvalidValue {
            field: "sim.reset_period".to_string(),
            reason: "must be nonzero".to_string(),
        });
    }
    if config.clock_period == 0 || config.clock_period % 2 != 0 {
        return Err(ConfigError::InvalidValue {
            field: "sim.clock_period".to_string(),
            reason: "must be even and nonzero".to_string(),
        });
    }
    if config.uart_clock_period == 0 {
        return Err(ConfigError::InvalidValue {
            field: "sim.uart_clock_period".to_string(),
            reason: "must be nonzero".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DEFAULT_CLOCK_PERIOD, DEFAULT_RESET_PERIOD};

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.reset_period, DEFAULT_RESET_PERIOD);
        assert_eq!(config.clock_period, DEFAULT_CLOCK_PERIOD);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[sim]
reset_period = 32
clock_period = 8
uart_clock_period = 512
seed = 12345
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.reset_period, 32);
        assert_eq!(config.clock_period, 8);
        assert_eq!(config.uart_clock_period, 512);
        assert_eq!(config.seed, Some(12345));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let toml = r#"
[sim]
clock_period = 4
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.clock_period, 4);
        assert_eq!(config.reset_period, DEFAULT_RESET_PERIOD);
    }

    #[test]
    fn reject_zero_reset_period() {
        let toml = "[sim]\nreset_period = 0\n";
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn reject_odd_clock_period() {
        let toml = "[sim]\nclock_period = 5\n";
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn reject_malformed_toml() {
        assert!(matches!(
            load_config_from_str("[sim"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
