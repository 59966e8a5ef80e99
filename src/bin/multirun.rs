// src/bin/multirun.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use multirun::{
    ErrorFlag,
    cli::Cli,
    core::{
        command::Command,
        pool::WorkerPool,
        queue::CommandQueue,
        source::{ChannelMode, CommandSource},
    },
    system::{
        executor::{CommandRunner, ShellRunner},
        run_log::RunLog,
    },
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The main entry point of the `multirun` application.
/// It sets up logging, parses arguments, runs the dispatch loop,
/// and performs centralized error handling.
fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match run(&cli) {
        Ok(true) => {}
        // At least one command failed; the per-command detail is in the run
        // log, the aggregate is the exit status.
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Wires the queue, the worker pool, and the producer together and runs the
/// dispatch to completion. Returns `Ok(true)` when every executed command
/// succeeded.
fn run(cli: &Cli) -> Result<bool> {
    log::debug!("command file : {}", cli.cmd_file.display());
    log::debug!("workers      : {}", cli.workers);
    log::debug!("log file     : {:?}", cli.log_file);
    log::debug!("follow mode  : {}", cli.follow);

    let run_log = Arc::new(match &cli.log_file {
        Some(path) => RunLog::create(path)?,
        None => RunLog::disabled(),
    });
    let queue = Arc::new(CommandQueue::new(cli.workers as usize));
    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner);
    let error_flag: ErrorFlag = Arc::new(AtomicBool::new(false));

    // Workers first, then the producer loop on the main thread.
    let pool = WorkerPool::spawn(&queue, &runner, &error_flag, &run_log)?;

    let mode = if cli.follow {
        ChannelMode::Follow
    } else {
        ChannelMode::Once
    };
    let source = CommandSource::new(cli.cmd_file.clone(), mode, Arc::clone(&queue));
    let source_result = source.run();
    if source_result.is_err() {
        // The producer died without emitting a terminate marker; emit one
        // here so no worker stays suspended on the queue forever.
        queue.push(Command::Terminate);
    }

    pool.join()?;

    let ok = !error_flag.load(Ordering::Relaxed);
    run_log.line(if ok {
        "main: all workers exited normally, I am exiting, bye"
    } else {
        "main: something went wrong, anyway, I am exiting, bye"
    });
    source_result?;
    Ok(ok)
}
