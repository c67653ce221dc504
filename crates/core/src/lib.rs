//! astatus-core: Update aggregation engine for astatus.
//!
//! This crate contains the [`UpdateSource`] trait, the fan-in update bus,
//! the [`Snapshot`] store, the [`UpdateManager`] that applies updates and
//! flushes frames on a fixed cadence, and the bar protocol writer.

pub mod bus;
pub mod constants;
mod data_source;
pub mod error;
mod snapshot;
mod update_manager;
mod writer;

pub use bus::{update_bus, UpdateReceiver, UpdateSender};
pub use constants::{FLUSH_INTERVAL, FRAME_TERMINATOR, PROTOCOL_HEADER};
pub use data_source::{BoxedUpdateSource, SourceHandle, SourceMetadata, UpdateSource};
pub use error::{OutputError, SourceError};
pub use snapshot::Snapshot;
pub use update_manager::UpdateManager;
pub use writer::ProtocolWriter;

// Re-export types used in public signatures for convenience
pub use astatus_types::{DisplayItem, Styling, UpdateEvent};
