use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use enumfield::EnumRule;
use serde::Serialize;

use crate::context::ConfigContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Derived Rules",
    commands: &[
        "enumfield rules Article            # Rules for every enum field",
        "enumfield rules Article status     # Rules for one field",
    ],
}];

#[derive(Args)]
pub struct RulesArgs {
    /// Model whose rules to show
    pub model: String,

    /// Restrict output to one field
    pub field: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldRule {
    pub field: String,
    #[serde(flatten)]
    pub rule: EnumRule,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RuleList(pub Vec<FieldRule>);

impl TableDisplay for RuleList {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(
            &mut table,
            options,
            &["Field", "Rule", "On", "Required", "Allow Empty", "Allowed", "Message"],
        );
        for entry in &self.0 {
            let rule = &entry.rule;
            table.add_row(vec![
                Cell::new(&entry.field),
                Cell::new(rule.name),
                Cell::new(format!("{:?}", rule.on).to_lowercase()),
                Cell::new(rule.required),
                Cell::new(rule.allow_empty),
                Cell::new(rule.allowed.join(", ")),
                Cell::new(&rule.message),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|entry| format!("{}.{}=[{}]", entry.field, entry.rule.name, entry.rule.allowed.join(",")))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn handle_rules(args: RulesArgs, ctx: &ConfigContext, output: &OutputManager) -> Result<()> {
    ctx.require_model(&args.model)?;

    let mut rules = Vec::new();
    match args.field.as_deref() {
        Some(field) => {
            for rule in ctx.registry.rules(&args.model, field)? {
                rules.push(FieldRule {
                    field: field.to_string(),
                    rule: rule.clone(),
                });
            }
        }
        None => {
            for entry in ctx.registry.fields(&args.model) {
                if entry.rules.is_empty() {
                    output.verbose(&format!("{} has validation disabled", entry.name));
                }
                rules.extend(entry.rules.iter().map(|rule| FieldRule {
                    field: entry.name.clone(),
                    rule: rule.clone(),
                }));
            }
        }
    }

    output.heading(&format!("Validation rules for {}", args.model));
    if rules.is_empty() {
        output.info("No validation rules attached");
        return Ok(());
    }
    output.display(&RuleList(rules))
}
