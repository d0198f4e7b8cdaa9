use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::context::ConfigContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Label to Key",
        commands: &["enumfield lookup key Article status inactive    # Stored key for a label"],
    },
    ExampleGroup {
        title: "Key to Label",
        commands: &["enumfield lookup value Article status 2         # Label stored under a key"],
    },
];

#[derive(Subcommand)]
pub enum LookupCommands {
    /// Find the key whose label matches exactly
    #[command(name = "key")]
    Key {
        model: String,
        field: String,
        /// Label to search for (as declared, before humanizing)
        label: String,
    },

    /// Find the label stored under a key
    #[command(name = "value")]
    Value {
        model: String,
        field: String,
        /// Key to look up; "1" and 1 are the same key
        key: String,
    },
}

#[derive(Debug, Serialize)]
pub struct LookupResult {
    pub model: String,
    pub field: String,
    pub input: String,
    /// `None` when the field exists but nothing matched.
    pub result: Option<String>,
}

impl TableDisplay for LookupResult {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(&mut table, options, &["Model", "Field", "Input", "Result"]);
        table.add_row(vec![
            Cell::new(&self.model),
            Cell::new(&self.field),
            Cell::new(&self.input),
            Cell::new(self.result.as_deref().unwrap_or("(not found)")),
        ]);
        table
    }

    fn to_compact(&self) -> String {
        self.result.clone().unwrap_or_default()
    }
}

pub fn handle_lookup_commands(command: LookupCommands, ctx: &ConfigContext, output: &OutputManager) -> Result<()> {
    let result = match command {
        LookupCommands::Key { model, field, label } => {
            ctx.require_model(&model)?;
            let found = ctx
                .registry
                .lookup_key_for_value(&model, &field, label.as_str())?
                .map(|key| key.coerce());
            LookupResult {
                model,
                field,
                input: label,
                result: found,
            }
        }
        LookupCommands::Value { model, field, key } => {
            ctx.require_model(&model)?;
            let found = ctx
                .registry
                .lookup_value_for_key(&model, &field, key.as_str())?
                .map(|label| label.to_string());
            LookupResult {
                model,
                field,
                input: key,
                result: found,
            }
        }
    };

    if result.result.is_none() {
        output.warning(&format!("No match for '{}' in {}.{}", result.input, result.model, result.field));
    }
    output.display(&result)
}
