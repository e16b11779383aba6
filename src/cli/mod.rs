//! CLI module - argument parsing, interactive prompts and subcommands

mod args;
mod prompts;
pub mod score;

pub use args::{Cli, Commands};
pub use prompts::*;
