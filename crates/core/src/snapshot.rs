//! Latest known text for every source

use astatus_types::{DisplayItem, Styling, UpdateEvent};
use log::warn;

/// Ordered status items plus a dirty flag.
///
/// Holds exactly one item per configured source for its whole lifetime.
/// Items are stored in display order, which is the reverse of source order:
/// the first configured source ends up rightmost on the bar.
#[derive(Debug, Clone)]
pub struct Snapshot {
    items: Vec<DisplayItem>,
    dirty: bool,
}

impl Snapshot {
    /// Create a snapshot with `source_count` empty items
    pub fn new(source_count: usize, styling: &Styling) -> Self {
        Self {
            items: (0..source_count).map(|_| DisplayItem::new(styling)).collect(),
            dirty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item changed since the last frame was taken
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Items in display order
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Display position of a source, `None` if the index is out of range
    pub fn display_position(&self, source: usize) -> Option<usize> {
        let len = self.items.len();
        (source < len).then(|| len - 1 - source)
    }

    /// Overwrite the text of the event's source and mark the snapshot dirty.
    ///
    /// Returns `false` (and changes nothing) for an unknown source index.
    pub fn apply(&mut self, event: UpdateEvent) -> bool {
        let Some(position) = self.display_position(event.source) else {
            warn!(
                "Dropping update for unknown source {} ({} sources configured)",
                event.source,
                self.items.len()
            );
            return false;
        };

        self.items[position].full_text = event.text;
        self.dirty = true;
        true
    }

    /// Take the items for a frame if anything changed, clearing the dirty flag
    pub fn take_frame(&mut self) -> Option<&[DisplayItem]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(&self.items)
    }
}
