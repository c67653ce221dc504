//! Default styling for status items
//!
//! Colors come from the environment when set, otherwise from the built-in
//! defaults. They are resolved once at startup and never change afterwards.

use astatus_types::{Color, Styling};
use log::warn;

/// Background color override, `#RRGGBBAA`
pub const BACKGROUND_VAR: &str = "ASTATUS_BACKGROUND";
/// Text color override, `#RRGGBBAA`
pub const COLOR_VAR: &str = "ASTATUS_COLOR";

/// Resolve styling from the process environment
pub fn styling_from_env() -> Styling {
    resolve_styling(|key| std::env::var(key).ok())
}

/// Resolve styling through `lookup`, falling back to the defaults for unset,
/// empty or malformed values
pub fn resolve_styling(lookup: impl Fn(&str) -> Option<String>) -> Styling {
    Styling {
        background: resolve_color(&lookup, BACKGROUND_VAR, Styling::DEFAULT_BACKGROUND),
        foreground: resolve_color(&lookup, COLOR_VAR, Styling::DEFAULT_FOREGROUND),
    }
}

fn resolve_color(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Color) -> Color {
    let Some(value) = lookup(key).filter(|v| !v.is_empty()) else {
        return default;
    };

    match value.parse() {
        Ok(color) => color,
        Err(e) => {
            warn!("Ignoring {}: {}; using {}", key, e, default);
            default
        }
    }
}
