//! Agaric CLI - guided mushroom edibility questionnaire.

use agaric_cli::cli::InterviewArgs;
use agaric_cli::commands;
use agaric_cli::{Cli, Command, Config, Formatter, Translator};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    // Log to stderr so table and JSON output stay clean
    let filter = EnvFilter::try_from_env("AGARIC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run() -> agaric_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load or create config
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init()?,
    };

    // Command-line overrides
    if let Some(rules) = cli.rules {
        config.settings.rules_path = Some(rules);
    }
    if let Some(evaluator) = cli.evaluator {
        config.engine.evaluator = evaluator.into();
    }
    if cli.lenient {
        config.engine.value_policy = agaric_engine::ValuePolicy::Lenient;
    }
    if let Some(locale) = cli.locale {
        config.settings.locale = locale;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let translations = Config::dir().map(|d| d.join("translations")).unwrap_or_default();
    let tr = Translator::load(&config.settings.locale, &translations)?;
    let engine = config.build_engine()?;

    match cli.command {
        None => {
            let args = InterviewArgs::default();
            commands::execute_interview(args, &engine, &tr, &formatter, &config.settings)?;
        }
        Some(Command::Interview(args)) => {
            commands::execute_interview(args, &engine, &tr, &formatter, &config.settings)?;
        }
        Some(Command::Classify(args)) => {
            commands::execute_classify(args, &engine, &tr, &formatter)?;
        }
        Some(Command::Rules(args)) => {
            commands::execute_rules(args, &engine, &tr, &formatter)?;
        }
        Some(Command::Attributes(args)) => {
            commands::execute_attributes(args, &engine, &tr, &formatter)?;
        }
    }

    Ok(())
}
