//! Application configuration: where the command list lives and what is in it

use astatus_types::Styling;
use log::debug;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::styling_from_env;

/// Environment variable that relocates the config directory
pub const XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";

/// Path of the config file below the base directory
const CONFIG_SUBPATH: [&str; 3] = [".config", "astatus", "astatus"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Application-wide configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// File the commands were read from
    pub path: PathBuf,
    /// Executables to run, in configuration order
    pub commands: Vec<String>,
    /// Colors applied to every status item
    pub styling: Styling,
}

impl AppConfig {
    /// Load configuration, using `explicit` instead of the default location if given
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = Self::config_path(explicit)?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            commands: parse_commands(&content),
            styling: styling_from_env(),
        })
    }

    /// Get the configuration file path
    fn config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        resolve_config_path(explicit, std::env::var_os(XDG_CONFIG_HOME), || {
            directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
        })
    }
}

/// Pick the config file.
///
/// An explicit path wins, then `$XDG_CONFIG_HOME/.config/astatus/astatus`,
/// then `$HOME/.config/astatus/astatus`. Empty values count as unset. The
/// home directory is only looked up when it is needed.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    xdg_config_home: Option<OsString>,
    home_dir: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }

    let base = match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home_dir().ok_or(ConfigError::NoHomeDir)?,
    };

    let path = CONFIG_SUBPATH.iter().fold(base, |path, part| path.join(part));
    debug!("Using config file {}", path.display());
    Ok(path)
}

/// One executable per line, in order.
///
/// Surrounding whitespace and a trailing `\r` are stripped. Blank lines and
/// `#` comments are skipped.
pub fn parse_commands(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
