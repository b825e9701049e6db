//! Attributes command implementation.

use crate::cli::AttributesArgs;
use crate::error::Result;
use crate::i18n::Translator;
use crate::output::Formatter;
use agaric_engine::Engine;

/// Execute the attributes command.
pub fn execute_attributes(
    args: AttributesArgs,
    engine: &Engine,
    tr: &Translator,
    formatter: &Formatter,
) -> Result<()> {
    match args.name {
        Some(name) => {
            let question = engine.question_for(&name, |k| tr.t(k))?;
            println!("{}", formatter.format_question(&question)?);
        }
        None => println!("{}", formatter.format_attributes(engine.catalog(), tr)?),
    }
    Ok(())
}
