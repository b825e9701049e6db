//! Rules command implementation.

use crate::cli::RulesArgs;
use crate::error::Result;
use crate::i18n::Translator;
use crate::output::Formatter;
use agaric_domain::Target;
use agaric_engine::Engine;

/// Execute the rules command.
pub fn execute_rules(
    args: RulesArgs,
    engine: &Engine,
    tr: &Translator,
    formatter: &Formatter,
) -> Result<()> {
    let target: Option<Target> = args.target.map(Into::into);
    let rules = engine
        .rules()
        .iter()
        .enumerate()
        .filter(|(_, rule)| target.is_none_or(|t| rule.target() == t));

    println!("{}", formatter.format_rules(rules, tr)?);
    Ok(())
}
