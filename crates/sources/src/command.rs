//! Command data source implementation
//!
//! Runs an external executable and turns every line it prints on stdout into
//! an update for its status item.

use astatus_core::{SourceError, SourceHandle, SourceMetadata, UpdateSender, UpdateSource};
use astatus_types::UpdateEvent;
use log::{debug, info, warn};
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

/// Command data source
///
/// The executable is launched with no arguments. Its stdin is closed and its
/// stderr only ever reaches the debug log, so stdout is the sole channel for
/// status text. The child is killed when the source is shut down.
pub struct CommandSource {
    metadata: SourceMetadata,
}

impl CommandSource {
    pub fn new(index: usize, command: impl Into<String>) -> Self {
        Self {
            metadata: SourceMetadata::new(index, command),
        }
    }
}

impl UpdateSource for CommandSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn start(self: Box<Self>, updates: UpdateSender) -> Result<SourceHandle, SourceError> {
        let command = &self.metadata.command;

        let mut child = Command::new(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SourceError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SourceError::MissingStdout {
                command: command.clone(),
            })?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(log_stderr(self.metadata.index, stderr));
        }

        info!(
            "Started source {} (`{}`, pid {})",
            self.metadata.index,
            command,
            child.id().map_or_else(|| "?".to_string(), |id| id.to_string())
        );

        let task = tokio::spawn(forward_lines(self.metadata.clone(), child, stdout, updates));
        Ok(SourceHandle::new(self.metadata, task))
    }
}

/// Forward stdout lines until the stream ends, then reap the child
async fn forward_lines(
    metadata: SourceMetadata,
    mut child: Child,
    stdout: ChildStdout,
    updates: UpdateSender,
) {
    let mut reader = BufReader::new(stdout);
    let mut buf = Vec::new();

    loop {
        match next_line(&mut reader, &mut buf).await {
            Ok(Some(text)) => {
                if updates.send(UpdateEvent::new(metadata.index, text)).is_err() {
                    // Aggregator is gone; dropping the child kills it
                    debug!("Source {} has no receiver, stopping", metadata.index);
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Source {} stopped reading stdout: {}", metadata.index, e);
                break;
            }
        }
    }

    match child.wait().await {
        Ok(status) if status.success() => {
            info!("Source {} (`{}`) exited", metadata.index, metadata.command)
        }
        Ok(status) => warn!(
            "Source {} (`{}`) exited with {}",
            metadata.index, metadata.command, status
        ),
        Err(e) => warn!("Failed to wait for source {}: {}", metadata.index, e),
    }
}

async fn log_stderr(index: usize, stderr: ChildStderr) {
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    while let Ok(Some(line)) = next_line(&mut reader, &mut buf).await {
        debug!("[source {}] {}", index, line);
    }
}

/// Read one line, without its `\n` or `\r\n` ending.
///
/// Invalid UTF-8 is replaced rather than treated as an error. Returns
/// `None` at end of stream.
async fn next_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use astatus_core::update_bus;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(10);

    async fn lines_of(mut input: &[u8]) -> Vec<String> {
        let mut buf = Vec::new();
        let mut lines = Vec::new();
        while let Some(line) = next_line(&mut input, &mut buf).await.unwrap() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_line_endings() {
        assert_eq!(
            lines_of(b"cpu 3%\nmem 41%\r\nlast").await,
            vec!["cpu 3%", "mem 41%", "last"]
        );
        assert_eq!(lines_of(b"\n\n").await, vec!["", ""]);
        assert!(lines_of(b"").await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        assert_eq!(lines_of(b"vol \xff 80%\n").await, vec!["vol \u{FFFD} 80%"]);
    }

    #[tokio::test]
    async fn test_echo_emits_one_line_then_ends() {
        let (tx, mut rx) = update_bus();
        let handle = Box::new(CommandSource::new(3, "echo")).start(tx).unwrap();
        assert_eq!(handle.metadata().index, 3);

        let event = timeout(WAIT, rx.recv()).await.unwrap();
        assert_eq!(event, Some(UpdateEvent::new(3, "")));

        // Child exits, reader task ends and drops its sender
        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), None);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_streaming_command_until_shutdown() {
        let (tx, mut rx) = update_bus();
        let handle = Box::new(CommandSource::new(0, "yes")).start(tx).unwrap();

        for _ in 0..3 {
            let event = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
            assert_eq!(event, UpdateEvent::new(0, "y"));
        }
        assert!(!handle.is_finished());

        handle.shutdown().await;
        // Drain what was already queued; the bus then closes
        while timeout(WAIT, rx.recv()).await.unwrap().is_some() {}
    }

    #[tokio::test]
    async fn test_silent_command_sends_nothing() {
        let (tx, mut rx) = update_bus();
        let handle = Box::new(CommandSource::new(1, "true")).start(tx).unwrap();

        assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), None);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_missing_executable_fails_to_start() {
        let (tx, _rx) = update_bus();
        let source = Box::new(CommandSource::new(0, "/nonexistent/astatus-test-command"));

        match source.start(tx) {
            Err(SourceError::Spawn { command, .. }) => {
                assert_eq!(command, "/nonexistent/astatus-test-command")
            }
            other => panic!("expected spawn error, got {:?}", other),
        }
    }
}
