use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use comfy_table::{Cell, Table};
use enumfield::{EnumError, SavePhase, ValidationIssue};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::context::ConfigContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Check a Record",
    commands: &[
        "enumfield check Article '{\"status\": 1}'                   # Check as a new record",
        "enumfield check Article --phase update '{\"status\": 9}'    # Check as an update",
        "enumfield check Article --file record.json",
    ],
}];

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum PhaseArg {
    #[default]
    Create,
    Update,
}

impl From<PhaseArg> for SavePhase {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::Create => SavePhase::Create,
            PhaseArg::Update => SavePhase::Update,
        }
    }
}

#[derive(Args)]
pub struct CheckArgs {
    /// Model whose rules to apply
    pub model: String,

    /// Record as a JSON object
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub record: Option<String>,

    /// Read the JSON record from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Save phase the record is checked for
    #[arg(long, value_enum, default_value = "create")]
    pub phase: PhaseArg,
}

#[derive(Debug, Serialize)]
pub struct IssueRow {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl From<ValidationIssue> for IssueRow {
    fn from(issue: ValidationIssue) -> Self {
        Self {
            field: issue.field,
            code: issue.code,
            message: issue.message,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct IssueList(pub Vec<IssueRow>);

impl TableDisplay for IssueList {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(&mut table, options, &["Field", "Code", "Message"]);
        for issue in &self.0 {
            table.add_row(vec![
                Cell::new(&issue.field),
                Cell::new(&issue.code),
                Cell::new(&issue.message),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0
            .iter()
            .map(|issue| format!("{}:{}", issue.field, issue.code))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn parse_record(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("Record is not valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Record must be a JSON object"),
    }
}

pub fn handle_check(args: CheckArgs, ctx: &ConfigContext, output: &OutputManager) -> Result<()> {
    ctx.require_model(&args.model)?;

    let raw = match (&args.record, &args.file) {
        (Some(record), _) => record.clone(),
        (None, Some(path)) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        (None, None) => anyhow::bail!("Provide a record or --file"),
    };
    let record = parse_record(&raw)?;

    match ctx.registry.check(&args.model, &record, args.phase.into()) {
        Ok(()) => {
            output.success(&format!("Record passes every enum rule of {}", args.model));
            Ok(())
        }
        Err(EnumError::Validation(err)) => {
            let count = err.issues.len();
            output.display(&IssueList(err.issues.into_iter().map(IssueRow::from).collect()))?;
            anyhow::bail!("Record failed {count} enum rule(s)")
        }
        Err(other) => Err(other.into()),
    }
}
