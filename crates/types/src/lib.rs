//! astatus-types: Shared data types for the astatus status line generator.
//!
//! Pure data types (colors, status items, update events) shared by the
//! engine, the sources and the binary.

pub mod color;
pub mod item;
pub mod update;

pub use color::{Color, ParseColorError, Styling};
pub use item::{DisplayItem, Markup};
pub use update::UpdateEvent;
