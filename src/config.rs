/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::{Error, Result};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub elevator_system: SystemConfig,
    #[serde(default)]
    pub elevator: ElevatorConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub n_elevators: usize,
    pub n_floors: i32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ElevatorConfig {
    pub move_delay_ms: u64,
    pub pickup_dropoff_delay_ms: u64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct IntakeConfig {
    pub poll_interval_ms: u64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Interactive,
    Simulation,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub simulation_requests: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        ElevatorConfig {
            move_delay_ms: 1000,
            pickup_dropoff_delay_ms: 2000,
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        IntakeConfig {
            poll_interval_ms: 1000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            mode: DisplayMode::Interactive,
            simulation_requests: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: Some("elevator_system.log".to_string()),
        }
    }
}

impl ElevatorConfig {
    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    pub fn pickup_dropoff_delay(&self) -> Duration {
        Duration::from_millis(self.pickup_dropoff_delay_ms)
    }
}

impl IntakeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Config {
    /// Configuration with default timings for a building of the given size.
    pub fn new(n_elevators: usize, n_floors: i32) -> Config {
        Config {
            elevator_system: SystemConfig {
                n_elevators,
                n_floors,
            },
            elevator: ElevatorConfig::default(),
            intake: IntakeConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Highest floor a request may name. Floors are `0..=max_floor`.
    pub fn max_floor(&self) -> i32 {
        self.elevator_system.n_floors
    }

    pub fn validate(&self) -> Result<()> {
        if self.elevator_system.n_elevators == 0 {
            return Err(Error::InvalidConfig(
                "n_elevators must be at least 1".to_string(),
            ));
        }
        if self.elevator_system.n_floors < 1 {
            return Err(Error::InvalidConfig(format!(
                "n_floors must be at least 1, got {}",
                self.elevator_system.n_floors
            )));
        }
        if self.intake.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        // Arrange
        let config_str = r#"
            [elevator_system]
            n_elevators = 4
            n_floors = 12

            [elevator]
            move_delay_ms = 10
            pickup_dropoff_delay_ms = 20

            [intake]
            poll_interval_ms = 5

            [display]
            mode = "simulation"
            simulation_requests = 7

            [logging]
            level = "debug"
            file = "sim.log"
        "#;

        // Act
        let config = parse_config(config_str).unwrap();

        // Assert
        assert_eq!(config.elevator_system.n_elevators, 4);
        assert_eq!(config.max_floor(), 12);
        assert_eq!(config.elevator.move_delay(), Duration::from_millis(10));
        assert_eq!(config.elevator.pickup_dropoff_delay(), Duration::from_millis(20));
        assert_eq!(config.intake.poll_interval(), Duration::from_millis(5));
        assert_eq!(config.display.mode, DisplayMode::Simulation);
        assert_eq!(config.display.simulation_requests, 7);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("sim.log"));
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        // Arrange
        let config_str = "[elevator_system]\nn_elevators = 2\nn_floors = 5\n";

        // Act
        let config = parse_config(config_str).unwrap();

        // Assert
        assert_eq!(config, Config::new(2, 5));
    }

    #[test]
    fn test_rejects_empty_fleet() {
        let config_str = "[elevator_system]\nn_elevators = 0\nn_floors = 5\n";

        match parse_config(config_str) {
            Err(Error::InvalidConfig(_)) => {}
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_toml() {
        match parse_config("[elevator_system\nn_elevators = 2") {
            Err(Error::ConfigParse(_)) => {}
            other => panic!("expected ConfigParse, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        // Arrange
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[elevator_system]\nn_elevators = 1\nn_floors = 3").unwrap();

        // Act
        let config = load_config(file.path()).unwrap();

        // Assert
        assert_eq!(config.elevator_system.n_elevators, 1);
        assert_eq!(config.max_floor(), 3);
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        match load_config(&missing) {
            Err(Error::ConfigRead { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected ConfigRead, got {:?}", other),
        }
    }
}
