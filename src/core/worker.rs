// src/core/worker.rs

use crate::ErrorFlag;
use crate::core::command::CommandKind;
use crate::core::queue::{BarrierArrival, CommandQueue};
use crate::system::executor::CommandRunner;
use crate::system::run_log::RunLog;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

/// One of the N identical dequeue-and-execute state machines.
///
/// Each worker loops `Idle -> Peeking -> {Executing, BarrierWaiting,
/// Terminated}`: it peeks the front of the shared queue, resolves it in the
/// variant-dependent way, and runs ordinary commands with the queue lock
/// released so long-running commands never block the other workers. A failed
/// command only sets the shared error flag; the worker keeps looping until
/// it observes the terminate marker.
pub struct Worker {
    id: usize,
    queue: Arc<CommandQueue>,
    runner: Arc<dyn CommandRunner>,
    error_flag: ErrorFlag,
    run_log: Arc<RunLog>,
}

impl Worker {
    pub fn new(
        id: usize,
        queue: Arc<CommandQueue>,
        runner: Arc<dyn CommandRunner>,
        error_flag: ErrorFlag,
        run_log: Arc<RunLog>,
    ) -> Self {
        Self {
            id,
            queue,
            runner,
            error_flag,
            run_log,
        }
    }

    /// The worker's run loop. Returns once the terminate marker has been
    /// observed; ordinary command failures never end the loop.
    pub fn run(&self) {
        loop {
            let front = self.queue.wait_and_peek_front();
            match front.command().kind() {
                CommandKind::Ordinary => {
                    // Claim it under the peek lock so no other worker can;
                    // the lock is released before the command runs.
                    let command_line = front.resolve_ordinary();
                    self.run_log
                        .line(&format!("worker {}: get command: &{}&", self.id, command_line));
                    self.execute(&command_line);
                }
                CommandKind::Barrier => {
                    log::debug!("worker {}: arrived at barrier", self.id);
                    if front.arrive_at_barrier() == BarrierArrival::Released {
                        log::debug!("worker {}: released barrier", self.id);
                    }
                }
                CommandKind::Terminate => {
                    front.observe_terminate();
                    log::debug!("worker {}: observed terminate", self.id);
                    return;
                }
            }
        }
    }

    fn execute(&self, command_line: &str) {
        match self.runner.run(command_line) {
            Ok(()) => {
                self.run_log.line(&format!(
                    "worker {}: execute done command: &{}&",
                    self.id, command_line
                ));
            }
            Err(e) => {
                log::warn!("worker {}: command failed: {}", self.id, e);
                self.run_log.line(&format!(
                    "worker {}: execute failed command: &{}&",
                    self.id, command_line
                ));
                self.error_flag.store(true, Ordering::Relaxed);
            }
        }
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker").field("id", &self.id).finish_non_exhaustive()
    }
}
