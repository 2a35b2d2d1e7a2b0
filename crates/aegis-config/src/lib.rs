//! Aegis Config
//!
//! Loads `aegis.config.json`: shell window metadata plus the bridge
//! allow tokens trusted startup code feeds into the capability gate.

mod config;
mod error;

pub use config::ShellConfig;
pub use error::ConfigError;

pub type Result<T> = std::result::Result<T, ConfigError>;
