//! Update events flowing from sources to the aggregator

/// The latest line emitted by one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEvent {
    /// Index of the source in configuration order
    pub source: usize,
    /// Line content without the trailing newline
    pub text: String,
}

impl UpdateEvent {
    pub fn new(source: usize, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
        }
    }
}
