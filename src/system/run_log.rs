// src/system/run_log.rs

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The optional per-run log sink shared by the producer and every worker.
///
/// One line per event; the mutex guarantees whole lines never interleave
/// between concurrent callers. With no sink configured, every call is a
/// no-op.
#[derive(Debug, Default)]
pub struct RunLog {
    sink: Option<Mutex<BufWriter<File>>>,
}

impl RunLog {
    /// A disabled log: every [`RunLog::line`] call is a no-op.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Opens (truncating) the log file. A sink that cannot be created is
    /// fatal at startup, before any worker runs.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to open log file: {}", path.display()))?;
        Ok(Self {
            sink: Some(Mutex::new(BufWriter::new(file))),
        })
    }

    /// Appends one line and flushes it, so the log stays observable while
    /// the run is in progress. Write errors are reported to the diagnostic
    /// log but never stop the run.
    pub fn line(&self, content: &str) {
        let Some(sink) = &self.sink else { return };
        if content.is_empty() {
            return;
        }
        let mut out = sink.lock();
        if let Err(e) = writeln!(out, "{content}").and_then(|()| out.flush()) {
            log::warn!("failed to write to log file: {e}");
        }
    }
}
