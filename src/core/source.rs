// src/core/source.rs

use crate::core::command::Command;
use crate::core::queue::CommandQueue;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

/// What the producer does when the command channel reaches end-of-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    /// EOF ends the input: a terminate marker is synthesized so the pool
    /// drains and shuts down. The right choice for a regular file.
    Once,
    /// Reopen the channel and keep reading, as for a FIFO fed by successive
    /// writer sessions. Only an `#exit` line stops the producer.
    Follow,
}

/// The producer: reads the command channel line by line and feeds the queue.
#[derive(Debug)]
pub struct CommandSource {
    path: PathBuf,
    mode: ChannelMode,
    queue: Arc<CommandQueue>,
}

impl CommandSource {
    pub fn new(path: PathBuf, mode: ChannelMode, queue: Arc<CommandQueue>) -> Self {
        Self { path, mode, queue }
    }

    /// Runs the producer loop to completion.
    ///
    /// Every line is trimmed and classified; blanks are skipped and
    /// everything else is enqueued, with the paired worker wake performed
    /// inside [`CommandQueue::push`]. Reading stops, mid-stream if
    /// necessary, as soon as a terminate marker has been emitted. A channel
    /// that cannot be opened or read is fatal at the point it occurs.
    pub fn run(&self) -> Result<()> {
        loop {
            let file = File::open(&self.path).with_context(|| {
                format!("failed to open command file: {}", self.path.display())
            })?;
            for line in BufReader::new(file).lines() {
                let line = line.with_context(|| {
                    format!("failed to read command file: {}", self.path.display())
                })?;
                let Some(command) = Command::parse(&line) else {
                    continue;
                };
                log::debug!("source: enqueue {command:?}");
                let terminate = command == Command::Terminate;
                self.queue.push(command);
                if terminate {
                    return Ok(());
                }
            }
            if self.mode == ChannelMode::Once {
                // EOF is terminal here; make sure the pool still shuts down.
                log::debug!("source: end of stream, emitting terminate");
                self.queue.push(Command::Terminate);
                return Ok(());
            }
            log::debug!("source: end of stream, reopening {}", self.path.display());
        }
    }
}
