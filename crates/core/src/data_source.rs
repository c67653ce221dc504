//! Update source trait and related types

use crate::bus::UpdateSender;
use crate::error::SourceError;
use log::{debug, error};
use tokio::task::JoinHandle;

/// Metadata about a configured source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Position in the configuration, 0-based
    pub index: usize,
    /// Executable the source runs
    pub command: String,
}

impl SourceMetadata {
    pub fn new(index: usize, command: impl Into<String>) -> Self {
        Self {
            index,
            command: command.into(),
        }
    }
}

/// Trait for anything that produces status text
///
/// A source is started once and then pushes an [`UpdateEvent`] onto the bus
/// for every new line of text it has. Sources never coordinate with each
/// other; each one runs on its own task.
///
/// [`UpdateEvent`]: astatus_types::UpdateEvent
pub trait UpdateSource: Send {
    /// Get metadata about this source
    fn metadata(&self) -> &SourceMetadata;

    /// Launch the source and start forwarding its updates to `updates`.
    ///
    /// Errors here are launch failures. Anything that goes wrong after a
    /// successful start just ends the stream of updates.
    fn start(self: Box<Self>, updates: UpdateSender) -> Result<SourceHandle, SourceError>;
}

/// Type-erased update source for dynamic dispatch
pub type BoxedUpdateSource = Box<dyn UpdateSource>;

/// A running source
///
/// Owns the task that reads the source. Shutting the handle down, or dropping
/// it, cancels that task together with everything it owns.
#[derive(Debug)]
pub struct SourceHandle {
    metadata: SourceMetadata,
    task: JoinHandle<()>,
}

impl SourceHandle {
    pub fn new(metadata: SourceMetadata, task: JoinHandle<()>) -> Self {
        Self { metadata, task }
    }

    pub fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    /// Whether the source has stopped producing updates
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the source and wait until its task is gone
    pub async fn shutdown(mut self) {
        self.task.abort();
        match (&mut self.task).await {
            Err(e) if e.is_panic() => {
                error!("Source {} (`{}`) panicked: {}", self.metadata.index, self.metadata.command, e);
            }
            _ => debug!("Source {} stopped", self.metadata.index),
        }
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::update_bus;
    use astatus_types::UpdateEvent;

    /// Emits a fixed list of lines and finishes
    struct ScriptedSource {
        metadata: SourceMetadata,
        lines: Vec<&'static str>,
    }

    impl UpdateSource for ScriptedSource {
        fn metadata(&self) -> &SourceMetadata {
            &self.metadata
        }

        fn start(self: Box<Self>, updates: UpdateSender) -> Result<SourceHandle, SourceError> {
            let index = self.metadata.index;
            let lines = self.lines;
            let task = tokio::spawn(async move {
                for line in lines {
                    let _ = updates.send(UpdateEvent::new(index, line));
                }
            });
            Ok(SourceHandle::new(self.metadata, task))
        }
    }

    #[tokio::test]
    async fn test_boxed_source_forwards_lines() {
        let (tx, mut rx) = update_bus();
        let source: BoxedUpdateSource = Box::new(ScriptedSource {
            metadata: SourceMetadata::new(4, "scripted"),
            lines: vec!["a", "b"],
        });
        assert_eq!(source.metadata().index, 4);

        let handle = source.start(tx).unwrap();
        assert_eq!(rx.recv().await, Some(UpdateEvent::new(4, "a")));
        assert_eq!(rx.recv().await, Some(UpdateEvent::new(4, "b")));
        assert_eq!(rx.recv().await, None);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_stops_pending_source() {
        let task = tokio::spawn(std::future::pending::<()>());
        let handle = SourceHandle::new(SourceMetadata::new(0, "forever"), task);
        assert!(!handle.is_finished());
        handle.shutdown().await;
    }
}
