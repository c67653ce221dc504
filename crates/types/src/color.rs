//! Foundational color type used for status item styling.
//!
//! The bar protocol carries colors as `#RRGGBBAA` strings, so `Color` keeps
//! 8-bit channels and serializes straight to that form.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// RGBA color with alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error returned when a string is not a `#RRGGBB` or `#RRGGBBAA` color
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {value:?}: expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError {
    pub value: String,
}

impl Color {
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// Parse `#RRGGBB` (opaque) or `#RRGGBBAA`. Hex digits are case-insensitive.
    pub fn from_hex(value: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError {
            value: value.to_string(),
        };

        let hex = value.strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(err());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let alpha = if hex.len() == 8 { channel(6)? } else { 0xFF };

        Ok(Self::from_rgba8(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Upper-case `#RRGGBBAA`, the form the bar expects
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgba8(0, 0, 0, 0xFF)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Background and foreground colors shared by every status item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styling {
    pub background: Color,
    pub foreground: Color,
}

impl Styling {
    /// `#282936BF`
    pub const DEFAULT_BACKGROUND: Color = Color::from_rgba8(0x28, 0x29, 0x36, 0xBF);
    /// `#F5F5F5FF`
    pub const DEFAULT_FOREGROUND: Color = Color::from_rgba8(0xF5, 0xF5, 0xF5, 0xFF);
}

impl Default for Styling {
    fn default() -> Self {
        Self {
            background: Self::DEFAULT_BACKGROUND,
            foreground: Self::DEFAULT_FOREGROUND,
        }
    }
}
