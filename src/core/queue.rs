// src/core/queue.rs

use crate::core::command::Command;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;

/// Outcome of a worker arriving at the front `Barrier` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierArrival {
    /// The caller was the last arrival and released the barrier.
    Released,
    /// The caller had to suspend and has since been woken by the releasing
    /// arrival.
    MustWait,
}

#[derive(Debug, Default)]
struct QueueState {
    commands: VecDeque<Command>,
    /// Workers currently suspended at the active barrier. Resets to zero
    /// exactly when it reaches the pool size.
    arrived: usize,
    /// Bumped once per released barrier, so a suspended arrival can tell its
    /// own release apart from a spurious wakeup.
    epoch: u64,
}

/// The shared command buffer plus all of its synchronization state.
///
/// One mutex serializes every access. Two condition variables are layered on
/// it: `not_empty` (the producer enqueued something) and `barrier_released`
/// (the last worker arrived at the front barrier). Workers never pop the
/// front directly: they peek it through [`FrontCommand`] and resolve it in a
/// variant-dependent way while still holding the lock, so a `Barrier` stays
/// visible to workers that have not yet arrived and a `Terminate` stays
/// visible to every worker forever.
#[derive(Debug)]
pub struct CommandQueue {
    state: Mutex<QueueState>,
    not_empty: Condvar,
    barrier_released: Condvar,
    pool_size: usize,
}

impl CommandQueue {
    /// Creates the queue for a pool of `pool_size` workers. The size is
    /// fixed for the life of the queue; the barrier releases on exactly the
    /// `pool_size`-th arrival.
    pub fn new(pool_size: usize) -> Self {
        assert!(pool_size >= 1, "pool size must be at least 1");
        Self {
            state: Mutex::new(QueueState::default()),
            not_empty: Condvar::new(),
            barrier_released: Condvar::new(),
            pool_size,
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Producer side: appends a command and performs the paired wake.
    ///
    /// `Terminate` wakes every suspended worker, since all of them must
    /// observe it; anything else wakes a single idle worker.
    pub fn push(&self, command: Command) {
        let wake_all = matches!(command, Command::Terminate);
        self.state.lock().commands.push_back(command);
        if wake_all {
            self.not_empty.notify_all();
        } else {
            self.not_empty.notify_one();
        }
    }

    /// Blocks the calling worker until the queue is non-empty, then returns
    /// a guard exposing the front command WITHOUT removing it.
    ///
    /// The guard keeps the queue locked until the front is resolved, so no
    /// other worker can claim the same command in between.
    pub fn wait_and_peek_front(&self) -> FrontCommand<'_> {
        let mut state = self.state.lock();
        while state.commands.is_empty() {
            self.not_empty.wait(&mut state);
        }
        FrontCommand { queue: self, state }
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Vec<Command> {
        self.state.lock().commands.iter().cloned().collect()
    }
}

/// A peeked-but-unresolved front command. Holds the queue lock until one of
/// the resolution methods consumes it (or it is dropped).
#[derive(Debug)]
pub struct FrontCommand<'a> {
    queue: &'a CommandQueue,
    state: MutexGuard<'a, QueueState>,
}

impl FrontCommand<'_> {
    /// The command currently at the front of the queue.
    pub fn command(&self) -> &Command {
        self.state.commands.front().expect("peeked an empty queue")
    }

    /// Pops the front command, which must be `Ordinary`, and returns its
    /// text. The lock is released on return, so the caller executes the
    /// command with the queue available to the other workers.
    pub fn resolve_ordinary(mut self) -> String {
        match self.state.commands.pop_front() {
            Some(Command::Ordinary(text)) => text,
            other => panic!("resolve_ordinary on a non-ordinary front: {other:?}"),
        }
    }

    /// Registers the calling worker at the front `Barrier` marker.
    ///
    /// The last arrival pops the marker, resets the arrival counter, and
    /// wakes all earlier arrivals; every other caller suspends here (lock
    /// released) until that happens. The marker is removed by exactly one
    /// worker, and stays at the front until it is, so workers that have not
    /// yet arrived still peek it.
    pub fn arrive_at_barrier(mut self) -> BarrierArrival {
        debug_assert!(matches!(self.command(), Command::Barrier));
        self.state.arrived += 1;
        if self.state.arrived == self.queue.pool_size {
            self.state.arrived = 0;
            self.state.epoch += 1;
            let front = self.state.commands.pop_front();
            debug_assert!(matches!(front, Some(Command::Barrier)));
            self.queue.barrier_released.notify_all();
            BarrierArrival::Released
        } else {
            let epoch = self.state.epoch;
            while self.state.epoch == epoch {
                self.queue.barrier_released.wait(&mut self.state);
            }
            BarrierArrival::MustWait
        }
    }

    /// Acknowledges the front `Terminate` marker without removing it.
    ///
    /// The marker is deliberately left in place forever: any worker that is
    /// still suspended on the queue, or peeks later, finds the same marker
    /// and shuts down too. Nothing can ever be processed after it, so
    /// removal is unnecessary.
    pub fn observe_terminate(self) {
        debug_assert!(matches!(self.command(), Command::Terminate));
    }
}
