//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::i18n::Translator;
use agaric_domain::{AttributeCatalog, Case, Conclusion, Rule, Target};
use agaric_engine::{Question, UNKNOWN_LABEL};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Result of classifying one case, ready for display.
#[derive(Debug, Clone)]
pub struct Verdict<'a> {
    /// Answers the verdict was reached from
    pub case: &'a Case,
    /// Every matching rule's conclusion, in rule order
    pub conclusions: &'a [Conclusion],
    /// Attribute to ask next when nothing matched
    pub next: Option<&'a str>,
}

impl Verdict<'_> {
    /// Target label, or `unknown`.
    pub fn label(&self) -> &'static str {
        self.conclusions
            .first()
            .map(|c| c.target.as_str())
            .unwrap_or(UNKNOWN_LABEL)
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a classification verdict.
    pub fn format_verdict(&self, verdict: &Verdict<'_>, tr: &Translator) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_verdict_json(verdict),
            OutputFormat::Table => Ok(self.format_verdict_table(verdict, tr)),
            OutputFormat::Quiet => Ok(verdict.label().to_string()),
        }
    }

    fn format_verdict_json(&self, verdict: &Verdict<'_>) -> Result<String> {
        let answers: serde_json::Map<String, serde_json::Value> = verdict
            .case
            .iter()
            .map(|(a, v)| (a.to_string(), v.into()))
            .collect();
        let conclusions: Vec<serde_json::Value> =
            verdict.conclusions.iter().map(conclusion_json).collect();

        let json = serde_json::json!({
            "label": verdict.label(),
            "primary_rule": verdict.conclusions.first().map(|c| c.rule.as_str()),
            "conclusions": conclusions,
            "answers": answers,
            "next_question": verdict.next,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn format_verdict_table(&self, verdict: &Verdict<'_>, tr: &Translator) -> String {
        let Some(primary) = verdict.conclusions.first() else {
            let mut lines = vec![
                self.warning(&tr.t("result.unknown")),
                tr.t("result.no_rule"),
            ];
            if let Some(next) = verdict.next {
                let question = tr.t(&format!("attributes.{}.question", next));
                lines.push(tr.t_with("result.next_question", &[("question", &question)]));
            }
            return lines.join("\n");
        };

        let mut lines = vec![
            self.target_banner(primary.target, tr),
            tr.t_with("result.matched_rule", &[("rule", &primary.description)]),
        ];
        if verdict.conclusions.len() > 1 {
            lines.push(String::new());
            lines.push(self.conclusions_table(verdict.conclusions, tr));
        }
        lines.push(String::new());
        lines.push(tr.t("app.disclaimer"));
        lines.join("\n")
    }

    fn conclusions_table(&self, conclusions: &[Conclusion], tr: &Translator) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Rule", "Target", "Description"]);
        for conclusion in conclusions {
            builder.push_record([
                conclusion.rule.clone(),
                tr.t(&format!("targets.{}", conclusion.target)),
                conclusion.description.clone(),
            ]);
        }
        self.finish_table(builder)
    }

    /// Format the rule base.
    pub fn format_rules<'r>(
        &self,
        rules: impl IntoIterator<Item = (usize, &'r Rule)>,
        tr: &Translator,
    ) -> Result<String> {
        let rules: Vec<(usize, &Rule)> = rules.into_iter().collect();
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = rules
                    .iter()
                    .map(|(position, rule)| {
                        let conditions: serde_json::Map<String, serde_json::Value> = rule
                            .conditions()
                            .iter()
                            .map(|c| (c.attribute.clone(), c.value.clone().into()))
                            .collect();
                        serde_json::json!({
                            "position": position,
                            "name": rule.name(),
                            "target": rule.target().as_str(),
                            "conditions": conditions,
                            "description": rule.description(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(rules
                .iter()
                .map(|(_, rule)| rule.name())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if rules.is_empty() {
                    return Ok(self.colorize("No rules found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Name", "Target", "Conditions"]);
                for (position, rule) in &rules {
                    let conditions = rule
                        .conditions()
                        .iter()
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                        .join(" AND ");
                    builder.push_record([
                        (position + 1).to_string(),
                        rule.name().to_string(),
                        tr.t(&format!("targets.{}", rule.target())),
                        conditions,
                    ]);
                }
                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format the attribute catalog.
    pub fn format_attributes(&self, catalog: &AttributeCatalog, tr: &Translator) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = catalog
                    .attributes()
                    .iter()
                    .map(|a| {
                        serde_json::json!({
                            "name": a.name(),
                            "question": tr.t(&format!("attributes.{}.question", a.name())),
                            "values": a.values(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(catalog.names().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Attribute", "Question", "Values"]);
                for attribute in catalog.attributes() {
                    builder.push_record([
                        attribute.name().to_string(),
                        tr.t(&format!("attributes.{}.question", attribute.name())),
                        attribute.values().join(", "),
                    ]);
                }
                Ok(self.finish_table(builder))
            }
        }
    }

    /// Format a question with numbered options.
    pub fn format_question(&self, question: &Question) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let options: Vec<serde_json::Value> = question
                    .options
                    .iter()
                    .map(|(code, label)| serde_json::json!({ "code": code, "label": label }))
                    .collect();
                let json = serde_json::json!({
                    "attribute": question.attribute,
                    "question": question.prompt,
                    "description": question.description,
                    "options": options,
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(question
                .options
                .iter()
                .map(|(code, _)| code.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut lines = vec![
                    self.colorize(&question.prompt, "cyan"),
                    self.colorize(&question.description, "dimmed"),
                    String::new(),
                ];
                for (number, (code, label)) in question.options.iter().enumerate() {
                    lines.push(format!("  {:>2}) {:<8} {}", number + 1, code, label));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Headline for a target: red for poisonous, green for edible.
    pub fn target_banner(&self, target: Target, tr: &Translator) -> String {
        let text = tr.t(&format!("result.{}", target));
        if target.is_unsafe() {
            self.colorize(&text, "red_bold")
        } else {
            self.colorize(&text, "green_bold")
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn finish_table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "red_bold" => text.red().bold().to_string(),
            "green" => text.green().to_string(),
            "green_bold" => text.green().bold().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "dimmed" => text.dimmed().to_string(),
            _ => text.to_string(),
        }
    }
}

fn conclusion_json(conclusion: &Conclusion) -> serde_json::Value {
    serde_json::json!({
        "rule": conclusion.rule,
        "target": conclusion.target.as_str(),
        "description": conclusion.description,
    })
}
