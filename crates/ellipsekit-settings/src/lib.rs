//! EllipseKit Settings Crate
//!
//! Handles ring configuration, synchronizer settings, and their persistence.

pub mod config;
pub mod error;

pub use config::{ClearPolicy, Config, SyncSettings, MAX_SETTLE_DELAY_MS};
pub use error::{ConfigError, SettingsError, SettingsResult};
