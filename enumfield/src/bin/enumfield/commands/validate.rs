use anyhow::Result;

use crate::context::ConfigContext;
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Configuration",
    commands: &[
        "enumfield validate                         # Check enums.toml",
        "enumfield --config enums.json validate     # Check a JSON config",
    ],
}];

pub fn handle_validate(ctx: &ConfigContext, output: &OutputManager) -> Result<()> {
    output.heading(&format!("Validating {}", ctx.config_path.display()));

    for model in ctx.registry.models() {
        let fields = ctx.registry.fields(model);
        let validated = fields.iter().filter(|entry| !entry.rules.is_empty()).count();
        output.bullet(&format!("{model}: {} enum field(s), {validated} validated", fields.len()));
    }

    if ctx.issues.is_empty() {
        output.success("All enum declarations are valid");
        return Ok(());
    }

    for issue in &ctx.issues {
        output.error(&issue.to_string());
    }
    anyhow::bail!("{} enum declaration(s) rejected", ctx.issues.len())
}
