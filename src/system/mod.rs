//! # System Interaction Layer
//!
//! This module is the boundary between the dispatch logic and the operating
//! system.
//!
//! ## Modules
//!
//! - **`executor`**: the subprocess primitive the workers are built on. It
//!   parses a command line, spawns it as a child process (with a `cmd /C`
//!   fallback for Windows built-ins), and reports success or failure.
//! - **`run_log`**: the optional per-run log sink shared by the producer and
//!   every worker, serialized so concurrent callers never interleave lines.

pub mod executor;
pub mod run_log;
