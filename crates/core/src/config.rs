//! Configuration file discovery
//!
//! A config file is looked up in priority order:
//! 1. Explicit path from an environment variable
//! 2. Current working directory
//! 3. XDG config home (`~/.config/surfsup/`)
//! 4. System config (`/etc/surfsup/`)
//!
//! When none exist the caller falls back to built-in defaults. CLI flags are
//! merged on top by the service itself.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where a configuration was loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    CurrentDir(PathBuf),
    XdgConfig(PathBuf),
    System(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Find `filename` in the standard locations, `env_var` naming an explicit path.
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    let explicit = env::var(env_var).ok().map(PathBuf::from);
    first_existing(candidates(explicit, filename))
}

fn candidates(explicit: Option<PathBuf>, filename: &str) -> Vec<ConfigSource> {
    let mut found = Vec::with_capacity(4);
    if let Some(path) = explicit {
        found.push(ConfigSource::Explicit(path));
    }
    found.push(ConfigSource::CurrentDir(PathBuf::from(filename)));
    found.push(ConfigSource::XdgConfig(xdg_config_dir().join(filename)));
    found.push(ConfigSource::System(
        Path::new("/etc").join(APP_NAME).join(filename),
    ));
    found
}

fn first_existing(sources: Vec<ConfigSource>) -> ConfigSource {
    sources
        .into_iter()
        .find(|source| source.path().is_some_and(Path::exists))
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_dir() -> PathBuf {
    match (env::var("XDG_CONFIG_HOME"), env::var("HOME")) {
        (Ok(xdg_config), _) => PathBuf::from(xdg_config).join(APP_NAME),
        (_, Ok(home)) => PathBuf::from(home).join(".config").join(APP_NAME),
        _ => PathBuf::from(".config").join(APP_NAME),
    }
}

/// Parse the TOML file behind `source`, or `T::default()` when there is none.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };
    debug!("reading config file {}", path.display());
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
