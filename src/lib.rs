use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Process-wide record of whether any executed command failed.
/// Monotonic: workers only ever flip it from `false` to `true`, and it is
/// read once at shutdown to choose the process exit status.
pub type ErrorFlag = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod system;
