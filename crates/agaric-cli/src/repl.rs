//! Interactive interview loop.

use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::i18n::Translator;
use crate::output::{Formatter, Verdict};
use agaric_engine::{Engine, Interview, Question, Rejection, Step};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A line typed at the interview prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    /// Leave the interview
    Exit,
    /// Show the command list
    Help,
    /// Discard every answer
    Reset,
    /// Explain where the interview stands
    Why,
    /// Answer the current question
    Answer(String),
}

/// Parse one line of input.
pub fn parse_input(line: &str) -> Option<ReplInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    Some(match line.to_lowercase().as_str() {
        "exit" | "quit" | "q" => ReplInput::Exit,
        "help" | "?" => ReplInput::Help,
        "reset" => ReplInput::Reset,
        "why" => ReplInput::Why,
        _ => ReplInput::Answer(line.to_string()),
    })
}

/// Map typed input onto an option code.
///
/// Accepts the option number (1-based), the code itself, or the label in
/// any case. Anything else is passed through for the engine to judge.
pub fn resolve_answer(question: &Question, input: &str) -> String {
    if let Ok(number) = input.parse::<usize>() {
        if let Some((code, _)) = number.checked_sub(1).and_then(|i| question.options.get(i)) {
            return code.clone();
        }
    }

    question
        .options
        .iter()
        .find(|(code, _)| code == input)
        .or_else(|| {
            question
                .options
                .iter()
                .find(|(code, label)| {
                    code.eq_ignore_ascii_case(input) || label.eq_ignore_ascii_case(input)
                })
        })
        .map(|(code, _)| code.clone())
        .unwrap_or_else(|| input.to_string())
}

/// Run an interview until the user exits.
pub fn run_interview(
    engine: &Engine,
    tr: &Translator,
    formatter: &Formatter,
    settings: &Settings,
    suggestions: Option<BTreeMap<String, String>>,
) -> Result<()> {
    println!("{}", formatter.info(&tr.t("app.title")));
    println!("{}", tr.t("interview.welcome"));
    println!();

    let config = rustyline::Config::builder()
        .max_history_size(settings.history_size)
        .map(|builder| builder.build())
        .map_err(|e| CliError::Config(format!("Invalid history size: {}", e)))?;
    let mut editor = DefaultEditor::with_config(config).map_err(|e| {
        CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut interview = engine.start_interview();
    if let Some(suggestions) = suggestions {
        let (_, rejected) = interview.absorb(suggestions)?;
        report_suggestions(&interview, &rejected, tr, formatter);
    }
    show_step(&interview, engine, tr, formatter)?;

    loop {
        let prompt = match interview.prompt() {
            Some(attribute) => format!("{}> ", attribute),
            None => "agaric> ".to_string(),
        };

        match editor.readline(&prompt) {
            Ok(line) => {
                let Some(input) = parse_input(&line) else {
                    continue;
                };
                editor.add_history_entry(line.trim()).ok();

                match input {
                    ReplInput::Exit => {
                        println!("{}", formatter.info(&tr.t("interview.goodbye")));
                        break;
                    }
                    ReplInput::Help => print_help(tr, formatter),
                    ReplInput::Reset => {
                        interview.reset();
                        println!("{}", formatter.info(&tr.t("interview.reset")));
                        show_step(&interview, engine, tr, formatter)?;
                    }
                    ReplInput::Why => print_why(&interview, engine, tr),
                    ReplInput::Answer(text) => match answer(&mut interview, engine, tr, &text) {
                        Ok(_) => show_step(&interview, engine, tr, formatter)?,
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info(&tr.t("interview.interrupted")));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

fn answer(
    interview: &mut Interview<'_>,
    engine: &Engine,
    tr: &Translator,
    text: &str,
) -> Result<Step> {
    let value = match interview.prompt() {
        Some(attribute) => {
            let question = engine.question_for(attribute, |k| tr.t(k))?;
            resolve_answer(&question, text)
        }
        None => text.to_string(),
    };
    Ok(interview.answer(&value)?)
}

fn show_step(
    interview: &Interview<'_>,
    engine: &Engine,
    tr: &Translator,
    formatter: &Formatter,
) -> Result<()> {
    match interview.current_step() {
        Step::Ask(attribute) => {
            let question = engine.question_for(&attribute, |k| tr.t(k))?;
            println!();
            println!(
                "{}",
                tr.t_with("interview.progress", &[("count", &interview.answered().to_string())])
            );
            println!("{}", formatter.format_question(&question)?);
        }
        Step::Concluded(outcome) => {
            let conclusions = outcome.conclusions();
            let verdict = Verdict {
                case: interview.case(),
                conclusions,
                next: None,
            };
            println!();
            println!("{}", formatter.format_verdict(&verdict, tr)?);
            println!("{}", formatter.info(&tr.t("interview.concluded_hint")));
        }
    }
    Ok(())
}

fn report_suggestions(
    interview: &Interview<'_>,
    rejected: &[Rejection],
    tr: &Translator,
    formatter: &Formatter,
) {
    for rejection in rejected {
        let reason = rejection.reason.to_string();
        println!(
            "{}",
            formatter.warning(&tr.t_with(
                "suggestions.skipped",
                &[
                    ("attribute", &rejection.attribute),
                    ("value", &rejection.value),
                    ("reason", &reason),
                ],
            ))
        );
    }
    let applied = interview.answered().to_string();
    println!(
        "{}",
        formatter.success(&tr.t_with("suggestions.applied", &[("count", &applied)]))
    );
}

fn print_why(interview: &Interview<'_>, engine: &Engine, tr: &Translator) {
    let case = interview.case();
    println!("{}", tr.t_with("why.answers", &[("count", &case.len().to_string())]));
    for (attribute, value) in case.iter() {
        let label = tr.t(&format!("attributes.{}.options.{}", attribute, value));
        println!("  {} = {} ({})", attribute, value, label);
    }

    println!(
        "{}",
        tr.t_with("why.viable", &[("count", &engine.viable_rule_count(case).to_string())])
    );
    let candidates = engine
        .scores(case)
        .into_iter()
        .take(3)
        .map(|s| format!("{} ({})", s.attribute, s.references))
        .collect::<Vec<_>>()
        .join(", ");
    if !candidates.is_empty() {
        println!("{}", tr.t_with("why.candidates", &[("attributes", &candidates)]));
    }
}

fn get_history_path() -> Result<PathBuf> {
    let dir = crate::config::Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(tr: &Translator, formatter: &Formatter) {
    println!("{}", formatter.info(&tr.t("help.title")));
    println!();
    for key in ["help.answer", "help.reset", "help.why", "help.help", "help.exit"] {
        println!("  {}", tr.t(key));
    }
    println!();
}
