//! astatus: a status line generator for i3bar and swaybar
//!
//! Runs a fixed list of commands, keeps the latest line each one printed and
//! writes the combined status to stdout once per second, in the bar's JSON
//! protocol.

pub mod app;
pub mod config;

// Re-export commonly used types
pub use config::AppConfig;
