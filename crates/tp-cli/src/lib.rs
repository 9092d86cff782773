//! Trip planner CLI library.
//!
//! This crate provides the `tp` command-line interface on top of the
//! scheduling core, the snapshot database and the travel assistant.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{AssistantConfig, Config};
