//! Agaric CLI library.
//!
//! This library provides the core functionality for the Agaric command-line interface,
//! including configuration management, translations, the interview loop and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod i18n;
pub mod output;
pub mod repl;
pub mod suggest;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use i18n::Translator;
pub use output::Formatter;
