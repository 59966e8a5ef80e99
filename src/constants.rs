// src/constants.rs

/// Reserved command line that makes every worker rendezvous before any
/// proceeds past it.
pub const SYNC_COMMAND: &str = "#sync";

/// Reserved command line that shuts the whole worker pool down.
pub const EXIT_COMMAND: &str = "#exit";
