//! Validation rules derived from enum declarations.
//!
//! Rules are data handed to the host's validation layer; the registry itself
//! never runs them. [`EnumRule::check`] is offered so a host without its own
//! rule engine can evaluate them with the same semantics.

use serde::Serialize;

use crate::errors::ValidationIssue;
use crate::inflector::{Inflector, Translator};
use crate::types::EnumValues;

pub const RULE_ALLOWED_VALUES: &str = "allowedValues";
pub const RULE_ALLOWED_VALUES_CREATE: &str = "allowedValuesCreate";
pub const RULE_ALLOWED_VALUES_UPDATE: &str = "allowedValuesUpdate";

/// Message template; `%s` is replaced by the joined labels.
pub const ALLOWED_VALUES_MESSAGE: &str = "Please choose one of the following values : %s";

/// Which save phase a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Create,
    Update,
    Always,
}

impl RuleScope {
    pub fn applies_to(self, phase: SavePhase) -> bool {
        match self {
            RuleScope::Always => true,
            RuleScope::Create => phase == SavePhase::Create,
            RuleScope::Update => phase == SavePhase::Update,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    Create,
    Update,
}

/// A submitted field value as seen by a rule check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmittedValue<'a> {
    /// Field not present in the submitted record.
    Missing,
    Null,
    Text(&'a str),
}

impl SubmittedValue<'_> {
    fn is_empty(&self) -> bool {
        matches!(self, SubmittedValue::Null | SubmittedValue::Text(""))
    }
}

/// "Value must be one of the declared keys" rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumRule {
    pub name: &'static str,
    pub allowed: Vec<String>,
    pub message: String,
    pub allow_empty: bool,
    pub required: bool,
    pub on: RuleScope,
}

impl EnumRule {
    /// Evaluates the rule against one submitted value.
    ///
    /// Returns `Ok(())` when the rule does not apply to `phase`.
    pub fn check(&self, field: &str, value: SubmittedValue<'_>, phase: SavePhase) -> Result<(), ValidationIssue> {
        if !self.on.applies_to(phase) {
            return Ok(());
        }

        let candidate = match value {
            SubmittedValue::Missing if self.required => {
                return Err(ValidationIssue::new(field, "enum.required", self.message.clone()));
            }
            SubmittedValue::Missing => return Ok(()),
            _ if value.is_empty() && self.allow_empty => return Ok(()),
            SubmittedValue::Null => "",
            SubmittedValue::Text(text) => text,
        };

        if self.allowed.iter().any(|allowed| allowed == candidate) {
            Ok(())
        } else {
            Err(ValidationIssue::new(field, "enum.not_allowed", self.message.clone()))
        }
    }
}

/// Builds the rule variants for one field.
///
/// `nullable` is the host column's nullability; `None` (unknown) is treated as
/// nullable.
pub fn derive_rules(
    values: &EnumValues,
    nullable: Option<bool>,
    translator: &dyn Translator,
    inflector: &dyn Inflector,
) -> Vec<EnumRule> {
    let labels = values
        .labels()
        .map(|label| translator.translate(&inflector.humanize(&label.to_string())))
        .collect::<Vec<_>>()
        .join(", ");

    let base = EnumRule {
        name: RULE_ALLOWED_VALUES,
        allowed: values.allowed_strings(),
        message: translator.translate(ALLOWED_VALUES_MESSAGE).replacen("%s", &labels, 1),
        allow_empty: values.allows_empty(),
        required: false,
        on: RuleScope::Always,
    };

    if nullable == Some(false) {
        vec![
            EnumRule {
                name: RULE_ALLOWED_VALUES_CREATE,
                required: true,
                on: RuleScope::Create,
                ..base.clone()
            },
            EnumRule {
                name: RULE_ALLOWED_VALUES_UPDATE,
                on: RuleScope::Update,
                ..base
            },
        ]
    } else {
        vec![base]
    }
}
