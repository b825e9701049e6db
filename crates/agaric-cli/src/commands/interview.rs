//! Interview command implementation.

use crate::cli::InterviewArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::i18n::Translator;
use crate::output::Formatter;
use crate::repl;
use crate::suggest::{read_suggestions, JsonSuggester};
use agaric_engine::Engine;

/// Execute the interview command.
pub fn execute_interview(
    args: InterviewArgs,
    engine: &Engine,
    tr: &Translator,
    formatter: &Formatter,
    settings: &Settings,
) -> Result<()> {
    let suggestions = match args.suggestions {
        Some(path) => Some(engine.suggest(&JsonSuggester, &read_suggestions(&path)?)?),
        None => None,
    };

    repl::run_interview(engine, tr, formatter, settings, suggestions)
}
