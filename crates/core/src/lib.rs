//! SurfsUp Core Library
//!
//! Shared pieces for the climate API service:
//! - Configuration file discovery (XDG-compliant)
//! - File system probes
//! - Application constants

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::readable_file;

/// Application name used for XDG paths
pub const APP_NAME: &str = "surfsup";

/// Default API port
pub const DEFAULT_PORT: u16 = 5000;

/// Default location of the pre-populated climate database
pub const DEFAULT_DATABASE: &str = "./hawaii.sqlite";
