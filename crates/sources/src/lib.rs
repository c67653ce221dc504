//! astatus-sources: Update source implementations for astatus.

mod command;

pub use command::CommandSource;
