// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

/// multirun: read commands from a file or FIFO and run them on a fixed pool
/// of worker threads.
///
/// The command file holds one command per line. Lines are trimmed, and blank
/// lines are ignored. Two reserved lines control the pool:
///
/// - `#sync`: every worker rendezvous here before any of them continues.
/// - `#exit`: the pool shuts down once the commands queued before it ran.
///
/// Every other line is executed verbatim as an external process. The process
/// exit status is 0 only if every executed command succeeded.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The file (or FIFO) to read commands from.
    pub cmd_file: PathBuf,

    /// The number of worker threads to run commands on.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub workers: u32,

    /// Append one line per event (command claimed, command finished, worker
    /// created/joined) to this file. If not given, the run log is disabled.
    #[arg(short = 'l', long)]
    pub log_file: Option<PathBuf>,

    /// Reopen the command file after end-of-stream instead of treating EOF
    /// as the end of the input. Use this when the file is a FIFO fed by
    /// successive writer sessions; only an `#exit` line stops the run.
    #[arg(long)]
    pub follow: bool,

    /// Log the resolved configuration and per-command progress to stderr.
    #[arg(long)]
    pub verbose: bool,
}
