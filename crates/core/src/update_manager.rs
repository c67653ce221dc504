//! Update manager for aggregating source updates and flushing frames
//!
//! Sole owner of the [`Snapshot`]. Applies every [`UpdateEvent`] as it
//! arrives, but only writes a frame on the fixed flush cadence, and only if
//! something changed since the previous frame.
//!
//! [`UpdateEvent`]: astatus_types::UpdateEvent

use crate::bus::UpdateReceiver;
use crate::error::OutputError;
use crate::snapshot::Snapshot;
use crate::writer::ProtocolWriter;
use log::{debug, info, trace};
use std::time::Duration;
use tokio::io::AsyncWrite;
use tokio::time::{Instant, MissedTickBehavior};

/// Drives the snapshot from the update bus and the flush timer
pub struct UpdateManager {
    snapshot: Snapshot,
    updates: UpdateReceiver,
    flush_interval: Duration,
}

impl UpdateManager {
    /// Create a new update manager
    pub fn new(snapshot: Snapshot, updates: UpdateReceiver, flush_interval: Duration) -> Self {
        Self {
            snapshot,
            updates,
            flush_interval,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Write the protocol header to `out`, then run the update loop.
    ///
    /// This runs indefinitely and only returns when output fails. Once every
    /// sender is gone the loop keeps ticking, so a pending change still makes
    /// it out, and then idles.
    pub async fn run<W: AsyncWrite + Unpin>(mut self, out: W) -> Result<(), OutputError> {
        let mut writer = ProtocolWriter::start(out).await?;

        let first_tick = Instant::now() + self.flush_interval;
        let mut interval = tokio::time::interval_at(first_tick, self.flush_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut updates_open = true;
        debug!(
            "Aggregating {} sources, flushing every {:?}",
            self.snapshot.len(),
            self.flush_interval
        );

        loop {
            tokio::select! {
                // Ticks first: a source that floods the bus must not starve flushes
                biased;

                _ = interval.tick() => {
                    self.flush(&mut writer).await?;
                }
                event = self.updates.recv(), if updates_open => match event {
                    Some(event) => {
                        self.snapshot.apply(event);
                    }
                    None => {
                        info!("All sources have stopped; keeping last known status");
                        updates_open = false;
                    }
                },
            }
        }
    }

    /// Write a frame if the snapshot is dirty. Returns whether one was written.
    async fn flush<W: AsyncWrite + Unpin>(
        &mut self,
        writer: &mut ProtocolWriter<W>,
    ) -> Result<bool, OutputError> {
        let Some(items) = self.snapshot.take_frame() else {
            return Ok(false);
        };

        let start = Instant::now();
        writer.write_frame(items).await?;
        trace!(
            "Frame {} written in {:?}",
            writer.frames_written(),
            start.elapsed()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::update_bus;
    use crate::constants::{FLUSH_INTERVAL, FRAME_TERMINATOR, PROTOCOL_HEADER};
    use astatus_types::{Styling, UpdateEvent};
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, DuplexStream};
    use tokio::time::{sleep_until, timeout};

    /// Read from the bar side until the buffered output ends with `suffix`
    async fn read_until(bar: &mut DuplexStream, suffix: &str) -> String {
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        while !out.ends_with(suffix.as_bytes()) {
            let n = bar.read(&mut buf).await.unwrap();
            assert!(n > 0, "output closed early");
            out.extend_from_slice(&buf[..n]);
        }
        String::from_utf8(out).unwrap()
    }

    async fn read_frame(bar: &mut DuplexStream) -> Vec<String> {
        let raw = read_until(bar, FRAME_TERMINATOR).await;
        let frame: Value = serde_json::from_str(raw.trim_end_matches(FRAME_TERMINATOR)).unwrap();
        frame
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["full_text"].as_str().unwrap().to_string())
            .collect()
    }

    async fn assert_silent(bar: &mut DuplexStream, period: Duration) {
        let mut buf = [0u8; 64];
        assert!(
            timeout(period, bar.read(&mut buf)).await.is_err(),
            "unexpected output"
        );
    }

    fn start(sources: usize) -> (crate::bus::UpdateSender, DuplexStream) {
        let (tx, rx) = update_bus();
        let (out, bar) = tokio::io::duplex(64 * 1024);
        let manager = UpdateManager::new(
            Snapshot::new(sources, &Styling::default()),
            rx,
            FLUSH_INTERVAL,
        );
        tokio::spawn(manager.run(out));
        (tx, bar)
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_sources_one_frame_then_idle() {
        let started = Instant::now();
        let (tx, mut bar) = start(2);

        assert_eq!(read_until(&mut bar, "[").await, PROTOCOL_HEADER);

        sleep_until(started + Duration::from_millis(200)).await;
        tx.send(UpdateEvent::new(0, "x")).unwrap();
        sleep_until(started + Duration::from_millis(300)).await;
        tx.send(UpdateEvent::new(1, "y")).unwrap();

        assert_eq!(read_frame(&mut bar).await, vec!["y", "x"]);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(1) && elapsed < Duration::from_millis(1100));

        // Nothing changed, so the tick at 2s stays silent
        assert_silent(&mut bar, Duration::from_millis(1500)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_keeps_only_last_update() {
        let (tx, mut bar) = start(1);
        read_until(&mut bar, "[").await;

        for i in 0..50 {
            tx.send(UpdateEvent::new(0, format!("tick {}", i))).unwrap();
        }

        assert_eq!(read_frame(&mut bar).await, vec!["tick 49"]);
        assert_silent(&mut bar, Duration::from_millis(2500)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_chatty_source_does_not_delay_flushes() {
        let started = Instant::now();
        let (tx, mut bar) = start(1);
        read_until(&mut bar, "[").await;

        tokio::spawn(async move {
            let mut i = 0u64;
            while tx.send(UpdateEvent::new(0, i.to_string())).is_ok() {
                i += 1;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });

        let first: u64 = read_frame(&mut bar).await[0].parse().unwrap();
        assert!(started.elapsed() < Duration::from_millis(1100));
        let second: u64 = read_frame(&mut bar).await[0].parse().unwrap();
        assert!(started.elapsed() < Duration::from_millis(2100));
        assert!(second > first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_update_flushed_after_sources_stop() {
        let (tx, mut bar) = start(2);
        read_until(&mut bar, "[").await;

        tx.send(UpdateEvent::new(1, "done")).unwrap();
        drop(tx);

        assert_eq!(read_frame(&mut bar).await, vec!["done", ""]);
        assert_silent(&mut bar, Duration::from_secs(3)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sources_only_header() {
        let (tx, mut bar) = start(0);
        drop(tx);

        assert_eq!(read_until(&mut bar, "[").await, PROTOCOL_HEADER);
        assert_silent(&mut bar, Duration::from_secs(5)).await;
    }

    #[tokio::test]
    async fn test_output_failure_ends_run() {
        let (_tx, rx) = update_bus();
        let (out, bar) = tokio::io::duplex(1024);
        drop(bar);

        let manager = UpdateManager::new(Snapshot::new(1, &Styling::default()), rx, FLUSH_INTERVAL);
        let result = manager.run(out).await;
        assert!(matches!(result, Err(OutputError::Io(_))));
    }
}
