use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use enumfield::LabelSets;

use crate::context::ConfigContext;
use crate::examples::ExampleGroup;
use crate::output::{GlobalOptions, OutputManager, TableDisplay, add_table_header, create_table};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Label Sets",
    commands: &[
        "enumfield labels Article                # Show every enum field's labels",
        "enumfield --output json labels Article  # Feed a selection control",
    ],
}];

#[derive(Args)]
pub struct LabelsArgs {
    /// Model whose label sets to show
    pub model: String,
}

impl TableDisplay for LabelSets {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = create_table(options);
        add_table_header(&mut table, options, &["Name", "Field", "Key", "Label"]);

        for set in self {
            for (index, (key, label)) in set.labels.iter().enumerate() {
                let (name, field) = if index == 0 {
                    (set.name.as_str(), set.field.as_str())
                } else {
                    ("", "")
                };
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(field),
                    Cell::new(key.coerce()),
                    Cell::new(label),
                ]);
            }
        }

        table
    }

    fn to_compact(&self) -> String {
        self.iter()
            .map(|set| {
                let labels: Vec<String> = set.labels.iter().map(|(key, label)| format!("{key}={label}")).collect();
                format!("{}: {}", set.name, labels.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn handle_labels(args: LabelsArgs, ctx: &ConfigContext, output: &OutputManager) -> Result<()> {
    ctx.require_model(&args.model)?;

    let sets = ctx.registry.all_label_sets(&args.model);
    output.heading(&format!("Label sets for {}", args.model));

    if sets.is_empty() {
        output.info("No non-empty enum fields declared");
        return Ok(());
    }

    output.display(&sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumfield::{ColumnNullability, EnumRegistry};
    use serde_json::json;

    #[test]
    fn compact_lists_keys_and_labels() {
        let mut registry = EnumRegistry::new();
        registry
            .register(
                "Article",
                [("status", json!({"1": "active", "2": "not_set"}))],
                &ColumnNullability::new(),
            )
            .unwrap();
        let sets = registry.all_label_sets("Article");
        assert_eq!(sets.to_compact(), "statuses: 1=Active, 2=Not Set");
    }
}
