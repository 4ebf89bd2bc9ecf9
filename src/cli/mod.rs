//! CLI module - argument parsing, prompts and the convert subcommand

pub mod args;
pub mod convert;
pub mod prompts;

pub use args::*;
pub use prompts::*;
