//! Classify command implementation.

use crate::cli::ClassifyArgs;
use crate::error::{CliError, Result};
use crate::i18n::Translator;
use crate::output::{Formatter, Verdict};
use crate::suggest::{read_suggestions, JsonSuggester};
use agaric_domain::Case;
use agaric_engine::Engine;
use tracing::warn;

/// Execute the classify command.
pub fn execute_classify(
    args: ClassifyArgs,
    engine: &Engine,
    tr: &Translator,
    formatter: &Formatter,
) -> Result<()> {
    let mut case = engine.reset();

    if let Some(path) = &args.suggestions {
        let suggestions = engine.suggest(&JsonSuggester, &read_suggestions(path)?)?;
        let report = engine.merge_suggestions(case, suggestions);
        for rejection in &report.rejected {
            warn!(
                attribute = %rejection.attribute,
                value = %rejection.value,
                "suggestion skipped: {}",
                rejection.reason
            );
        }
        case = report.case;
    }

    case = apply_answers(engine, case, &args.answers)?;

    let conclusions = engine.evaluate(&case);
    let next = if conclusions.is_empty() {
        engine.next_attribute(&case)
    } else {
        None
    };

    let verdict = Verdict {
        case: &case,
        conclusions: &conclusions,
        next: next.as_deref(),
    };
    println!("{}", formatter.format_verdict(&verdict, tr)?);
    Ok(())
}

/// Split an `attribute=value` argument.
pub fn parse_assignment(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((attribute, value)) if !attribute.trim().is_empty() && !value.trim().is_empty() => {
            Ok((attribute.trim(), value.trim()))
        }
        _ => Err(CliError::InvalidInput(format!(
            "expected attribute=value, got '{}'",
            arg
        ))),
    }
}

/// Validate and record every `attribute=value` argument.
pub fn apply_answers(engine: &Engine, mut case: Case, answers: &[String]) -> Result<Case> {
    for arg in answers {
        let (attribute, value) = parse_assignment(arg)?;
        case = engine.submit_answer(case, attribute, value)?;
    }
    Ok(case)
}
