//! SlotMill Settings Crate
//!
//! Handles the configuration file: toolpath parameters, program options and
//! output target, stored as TOML or JSON.

pub mod config;
pub mod error;

pub use config::{Config, OutputSettings, OutputTarget};
pub use error::{SettingsError, SettingsResult};
