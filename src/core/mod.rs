// src/core/mod.rs

pub mod command;
pub mod pool;
pub mod queue;
pub mod source;
pub mod worker;
