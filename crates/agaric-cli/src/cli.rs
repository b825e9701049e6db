//! CLI command definitions and argument parsing.

use agaric_engine::EvaluatorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Agaric - guided mushroom edibility questionnaire.
#[derive(Debug, Parser)]
#[command(name = "agaric")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "AGARIC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Rule definition file replacing the built-in one
    #[arg(short, long, global = true, env = "AGARIC_RULES")]
    pub rules: Option<PathBuf>,

    /// Rule evaluator
    #[arg(long, value_enum, global = true)]
    pub evaluator: Option<EvaluatorArg>,

    /// Accept answers outside an attribute's known values
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Translation locale (built in: en, tr)
    #[arg(short, long, global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (labels and names only)
    Quiet,
}

/// Evaluator options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EvaluatorArg {
    /// Linear scan over the rule base
    Naive,
    /// Inverted index over rule conditions
    Indexed,
}

/// Classification target filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TargetArg {
    /// Edible rules only
    Edible,
    /// Poisonous rules only
    Poisonous,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer questions one at a time until the mushroom is classified
    Interview(InterviewArgs),

    /// Classify from answers given on the command line
    Classify(ClassifyArgs),

    /// List the rule base in priority order
    Rules(RulesArgs),

    /// List attributes, or show the question for one of them
    Attributes(AttributesArgs),
}

/// Arguments for the interview command.
#[derive(Debug, Default, Parser)]
pub struct InterviewArgs {
    /// JSON file of suggested answers applied before the first question
    #[arg(short, long)]
    pub suggestions: Option<PathBuf>,
}

/// Arguments for the classify command.
#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Answers as attribute=value pairs (e.g., odor=n stalk_shape=t)
    #[arg(required_unless_present = "suggestions")]
    pub answers: Vec<String>,

    /// JSON file of suggested answers merged before the explicit ones
    #[arg(short, long)]
    pub suggestions: Option<PathBuf>,
}

/// Arguments for the rules command.
#[derive(Debug, Parser)]
pub struct RulesArgs {
    /// Only show rules concluding this target
    #[arg(short, long, value_enum)]
    pub target: Option<TargetArg>,
}

/// Arguments for the attributes command.
#[derive(Debug, Parser)]
pub struct AttributesArgs {
    /// Attribute to show in full
    pub name: Option<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<EvaluatorArg> for EvaluatorKind {
    fn from(evaluator: EvaluatorArg) -> Self {
        match evaluator {
            EvaluatorArg::Naive => EvaluatorKind::Naive,
            EvaluatorArg::Indexed => EvaluatorKind::Indexed,
        }
    }
}

impl From<TargetArg> for agaric_domain::Target {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Edible => agaric_domain::Target::Edible,
            TargetArg::Poisonous => agaric_domain::Target::Poisonous,
        }
    }
}
