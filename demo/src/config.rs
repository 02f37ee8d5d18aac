//! Configuration module for the demo driver
//!
//! Runtime configuration for the scenario and stress runs, loaded from a
//! TOML file with defaults when the file is missing or malformed.

use log::warn;
use once_cell::sync::OnceCell;
use serde_derive::Deserialize;
use std::sync::Mutex;

/// Global configuration instance
static INSTANCE: OnceCell<Mutex<DemoConfig>> = OnceCell::new();

/// Returns a reference to the global configuration instance
pub fn instance() -> &'static Mutex<DemoConfig> {
    INSTANCE.get_or_init(|| Mutex::new(DemoConfig::new()))
}

/// Runtime configuration for the demo driver
#[derive(Debug, Deserialize, Clone)]
pub struct DemoConfig {
    /// Symbol used by the multi-threaded stress pass
    pub stress_symbol: String,
    /// Number of placement threads in the stress pass
    pub stress_threads: usize,
    /// Orders placed per thread in the stress pass
    pub stress_orders: usize,
}

impl DemoConfig {
    /// Creates a new DemoConfig with default values
    pub fn new() -> Self {
        DemoConfig {
            stress_symbol: "AXIS".to_string(),
            stress_threads: 4,
            stress_orders: 250,
        }
    }

    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file cannot be read or parsed.
    pub fn from_toml(path: &str) -> Option<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Something went wrong reading the demo config file, {:?}", e);
                return Some(DemoConfig::new());
            }
        };
        let config: DemoConfig = match toml::from_str(&contents) {
            Ok(c) => c,
            Err(e) => {
                warn!("Something went wrong reading the demo config file, {:?}", e);
                return Some(DemoConfig::new());
            }
        };
        if let Ok(mut instance) = instance().lock() {
            instance.clone_from(&config);
        }
        Some(config)
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::new()
    }
}
