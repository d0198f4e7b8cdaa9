use crate::commands::{check, labels, lookup, rules, validate};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "labels",
            groups: labels::EXAMPLES,
        },
        CommandExample {
            name: "lookup",
            groups: lookup::EXAMPLES,
        },
        CommandExample {
            name: "rules",
            groups: rules::EXAMPLES,
        },
        CommandExample {
            name: "check",
            groups: check::EXAMPLES,
        },
        CommandExample {
            name: "validate",
            groups: validate::EXAMPLES,
        },
    ]
}
