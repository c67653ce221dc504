//! Shared constants for the engine and the bar protocol

use std::time::Duration;

/// How often the snapshot is checked and, if changed, written out
pub const FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Written once before any frame: the protocol declaration followed by the
/// opening of the never-closed frame array.
pub const PROTOCOL_HEADER: &str = "{\"version\": 1, \"click_events\": false}\n[";

/// Follows every encoded frame. The leading newline terminates the encoded
/// value, the comma separates it from the next frame.
pub const FRAME_TERMINATOR: &str = "\n,\n";
