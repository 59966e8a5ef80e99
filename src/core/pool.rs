// src/core/pool.rs

use crate::ErrorFlag;
use crate::core::queue::CommandQueue;
use crate::core::worker::Worker;
use crate::system::executor::CommandRunner;
use crate::system::run_log::RunLog;
use anyhow::{Context, Result, anyhow};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Owns and supervises the fixed set of worker threads.
///
/// The pool is spawned once at startup; [`WorkerPool::join`] blocks until
/// every worker has observed the terminate marker, so the process never
/// exits while a command is still executing or a worker is still suspended
/// at a barrier.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    run_log: Arc<RunLog>,
}

impl WorkerPool {
    /// Spawns `queue.pool_size()` workers, each bound to the shared queue,
    /// runner, error flag, and run log.
    pub fn spawn(
        queue: &Arc<CommandQueue>,
        runner: &Arc<dyn CommandRunner>,
        error_flag: &ErrorFlag,
        run_log: &Arc<RunLog>,
    ) -> Result<Self> {
        let mut handles = Vec::with_capacity(queue.pool_size());
        for id in 0..queue.pool_size() {
            let worker = Worker::new(
                id,
                Arc::clone(queue),
                Arc::clone(runner),
                Arc::clone(error_flag),
                Arc::clone(run_log),
            );
            let handle = thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn(move || worker.run())
                .with_context(|| format!("failed to spawn worker thread {id}"))?;
            run_log.line(&format!("main: created worker {id}"));
            handles.push(handle);
        }
        Ok(Self {
            handles,
            run_log: Arc::clone(run_log),
        })
    }

    /// Waits for every worker to reach its terminal state.
    pub fn join(self) -> Result<()> {
        let Self { handles, run_log } = self;
        for (id, handle) in handles.into_iter().enumerate() {
            handle
                .join()
                .map_err(|_| anyhow!("worker thread {id} panicked"))?;
            run_log.line(&format!("main: joined worker {id}"));
        }
        Ok(())
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.handles.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::Command;
    use crate::system::executor::ExecutionError;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    /// Records a `start`/`done` event around every invocation. Commands
    /// whose line starts with `fail` report a non-zero exit; commands whose
    /// line starts with `slow` sleep before finishing.
    #[derive(Debug, Default)]
    struct RecordingRunner {
        events: Mutex<Vec<String>>,
    }

    impl RecordingRunner {
        fn events(&self) -> Vec<String> {
            self.events.lock().clone()
        }

        fn position(&self, event: &str) -> usize {
            let events = self.events();
            events
                .iter()
                .position(|e| e == event)
                .unwrap_or_else(|| panic!("event '{event}' not found in {events:?}"))
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, command_line: &str) -> Result<(), ExecutionError> {
            self.events.lock().push(format!("start {command_line}"));
            if command_line.starts_with("slow") {
                std::thread::sleep(Duration::from_millis(100));
            }
            self.events.lock().push(format!("done {command_line}"));
            if command_line.starts_with("fail") {
                Err(ExecutionError::NonZeroExitStatus(command_line.to_string()))
            } else {
                Ok(())
            }
        }
    }

    /// Spins up a pool of `pool_size` workers, feeds it `commands` followed
    /// by a terminate marker, and joins it. Returns `true` when no command
    /// failed.
    fn dispatch(pool_size: usize, commands: &[Command], runner: &Arc<RecordingRunner>) -> bool {
        let queue = Arc::new(CommandQueue::new(pool_size));
        let runner: Arc<dyn CommandRunner> = runner.clone();
        let error_flag: ErrorFlag = Arc::new(AtomicBool::new(false));
        let run_log = Arc::new(RunLog::disabled());

        let pool = WorkerPool::spawn(&queue, &runner, &error_flag, &run_log).unwrap();
        for command in commands {
            queue.push(command.clone());
        }
        queue.push(Command::Terminate);
        pool.join().unwrap();

        !error_flag.load(Ordering::Relaxed)
    }

    fn ordinary(text: &str) -> Command {
        Command::Ordinary(text.to_string())
    }

    #[test]
    fn every_command_runs_exactly_once() {
        let runner = Arc::new(RecordingRunner::default());
        let commands = [ordinary("echo a"), ordinary("echo b"), ordinary("echo c")];
        assert!(dispatch(3, &commands, &runner));

        let mut started: Vec<_> = runner
            .events()
            .into_iter()
            .filter(|e| e.starts_with("start "))
            .collect();
        started.sort();
        assert_eq!(started, ["start echo a", "start echo b", "start echo c"]);
    }

    #[test]
    fn terminate_alone_shuts_down_without_running_anything() {
        let runner = Arc::new(RecordingRunner::default());
        assert!(dispatch(4, &[], &runner));
        assert!(runner.events().is_empty());
    }

    #[test]
    fn commands_after_a_barrier_wait_for_every_worker() {
        let runner = Arc::new(RecordingRunner::default());
        let commands = [
            ordinary("slow one"),
            ordinary("slow two"),
            Command::Barrier,
            ordinary("echo post"),
        ];
        assert!(dispatch(2, &commands, &runner));

        // Both workers must finish their pre-barrier command before either
        // passes the barrier, so "echo post" cannot start earlier.
        let post_start = runner.position("start echo post");
        assert!(post_start > runner.position("done slow one"));
        assert!(post_start > runner.position("done slow two"));
    }

    #[test]
    fn a_failing_command_flips_the_error_flag_but_not_the_run() {
        let runner = Arc::new(RecordingRunner::default());
        let commands = [ordinary("fail early"), Command::Barrier, ordinary("echo ok")];
        assert!(!dispatch(2, &commands, &runner));

        // The failure did not stop the pool: the post-barrier command ran.
        assert!(runner.position("start echo ok") > runner.position("done fail early"));
    }

    #[test]
    fn consecutive_barriers_pass_without_executing_anything() {
        let runner = Arc::new(RecordingRunner::default());
        assert!(dispatch(3, &[Command::Barrier, Command::Barrier], &runner));
        assert!(runner.events().is_empty());
    }

    #[test]
    fn a_single_worker_pool_drains_the_queue_in_order() {
        let runner = Arc::new(RecordingRunner::default());
        let commands = [
            ordinary("echo a"),
            Command::Barrier,
            ordinary("echo b"),
        ];
        assert!(dispatch(1, &commands, &runner));
        assert_eq!(
            runner.events(),
            ["start echo a", "done echo a", "start echo b", "done echo b"]
        );
    }
}
