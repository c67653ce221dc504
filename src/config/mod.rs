//! Configuration management

mod defaults;
mod settings;

pub use defaults::{resolve_styling, styling_from_env, BACKGROUND_VAR, COLOR_VAR};
pub use settings::{parse_commands, resolve_config_path, AppConfig, ConfigError, XDG_CONFIG_HOME};
