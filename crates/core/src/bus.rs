//! Fan-in channel from all sources to the aggregator.
//!
//! Unbounded so that a slow aggregator never stalls a source and one chatty
//! source never holds back the others.

use astatus_types::UpdateEvent;
use tokio::sync::mpsc;

pub type UpdateSender = mpsc::UnboundedSender<UpdateEvent>;
pub type UpdateReceiver = mpsc::UnboundedReceiver<UpdateEvent>;

/// Create the update bus. Clone the sender once per source.
pub fn update_bus() -> (UpdateSender, UpdateReceiver) {
    mpsc::unbounded_channel()
}
