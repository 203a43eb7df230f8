//! CLI library components for the lab-result merge.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
