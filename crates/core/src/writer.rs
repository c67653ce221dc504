//! Bar protocol output

use crate::constants::{FRAME_TERMINATOR, PROTOCOL_HEADER};
use crate::error::OutputError;
use astatus_types::DisplayItem;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes the streaming frame array the bar reads from our stdout.
///
/// The header is written by [`ProtocolWriter::start`], so no frame can ever
/// precede it.
pub struct ProtocolWriter<W> {
    out: W,
    frames_written: u64,
}

impl<W: AsyncWrite + Unpin> ProtocolWriter<W> {
    /// Write the protocol header and return a writer ready for frames
    pub async fn start(mut out: W) -> Result<Self, OutputError> {
        out.write_all(PROTOCOL_HEADER.as_bytes()).await?;
        out.flush().await?;
        Ok(Self {
            out,
            frames_written: 0,
        })
    }

    /// Encode `items` as one JSON array and append it to the stream
    pub async fn write_frame(&mut self, items: &[DisplayItem]) -> Result<(), OutputError> {
        let mut frame = serde_json::to_vec(items)?;
        frame.extend_from_slice(FRAME_TERMINATOR.as_bytes());

        self.out.write_all(&frame).await?;
        self.out.flush().await?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
