use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::declaration::IntoDeclaration;
use crate::errors::{ConfigurationError, ConfigurationIssue, EnumError, EnumResult, ValidationError};
use crate::inflector::{DefaultInflector, IdentityTranslator, Inflector, Translator};
use crate::rules::{EnumRule, SavePhase, SubmittedValue, derive_rules};
use crate::types::{EnumDeclaration, EnumKey, EnumLabel};

/// Per-field "column allows null" flags from host schema introspection.
/// Fields missing from the map are treated as nullable.
pub type ColumnNullability = HashMap<String, bool>;

/// A registered enum field.
#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub name: String,
    pub declaration: EnumDeclaration,
    /// Empty when the declaration opted out of validation.
    pub rules: Vec<EnumRule>,
}

#[derive(Debug, Clone, Default)]
struct ModelEntry {
    fields: Vec<FieldEntry>,
}

impl ModelEntry {
    fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|entry| entry.name == name)
    }
}

/// Holds the enum declarations of every registered model.
///
/// Models are registered once during setup (`&mut self`) and read afterwards
/// (`&self`); share the populated registry behind an `Arc` if lookups happen
/// on several threads.
pub struct EnumRegistry {
    models: HashMap<String, ModelEntry>,
    translator: Box<dyn Translator + Send + Sync>,
    inflector: Box<dyn Inflector + Send + Sync>,
}

impl Default for EnumRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnumRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumRegistry")
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}

impl EnumRegistry {
    /// Registry with identity translation and the built-in inflector.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
            translator: Box::new(IdentityTranslator),
            inflector: Box::new(DefaultInflector),
        }
    }

    /// Replaces the translation service. Affects models registered afterwards
    /// and every later `all_label_sets` call.
    pub fn with_translator<T>(mut self, translator: T) -> Self
    where
        T: Translator + Send + Sync + 'static,
    {
        self.translator = Box::new(translator);
        self
    }

    pub fn with_inflector<I>(mut self, inflector: I) -> Self
    where
        I: Inflector + Send + Sync + 'static,
    {
        self.inflector = Box::new(inflector);
        self
    }

    /// Registers (or re-registers) the enum fields of `model`.
    ///
    /// Each field is decoded and stored independently: a malformed declaration
    /// is reported in the returned [`ConfigurationError`] while the remaining
    /// fields are still registered. Registering a model that already exists
    /// replaces its previous entry.
    pub fn register<I, N, D>(
        &mut self,
        model: &str,
        fields: I,
        nullability: &ColumnNullability,
    ) -> Result<(), ConfigurationError>
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: IntoDeclaration,
    {
        let mut entry = ModelEntry::default();
        let mut seen = HashSet::new();
        let mut issues = Vec::new();

        for (name, raw) in fields {
            let name = name.into();
            if !seen.insert(name.clone()) {
                issues.push(ConfigurationIssue::new(&name, "field declared more than once"));
                continue;
            }

            let declaration = match raw.into_declaration(&name) {
                Ok(declaration) => declaration,
                Err(issue) => {
                    log::warn!("rejected enum field {model}.{}: {}", issue.field, issue.message);
                    issues.push(issue);
                    continue;
                }
            };

            let rules = if declaration.validates() {
                derive_rules(
                    declaration.values(),
                    nullability.get(&name).copied(),
                    self.translator.as_ref(),
                    self.inflector.as_ref(),
                )
            } else {
                Vec::new()
            };

            entry.fields.push(FieldEntry {
                name,
                declaration,
                rules,
            });
        }

        log::debug!(
            "registered {} enum field(s) for model {model} ({} rejected)",
            entry.fields.len(),
            issues.len()
        );
        if self.models.insert(model.to_string(), entry).is_some() {
            log::debug!("model {model} re-registered, previous enum fields replaced");
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::new(issues))
        }
    }

    /// Drops every declaration of `model`. Returns whether it was registered.
    pub fn dispose(&mut self, model: &str) -> bool {
        let removed = self.models.remove(model).is_some();
        if removed {
            log::debug!("disposed enum fields of model {model}");
        }
        removed
    }

    pub fn is_registered(&self, model: &str) -> bool {
        self.models.contains_key(model)
    }

    /// Registered model names, sorted.
    pub fn models(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fields of `model` in registration order; empty for unknown models.
    pub fn fields(&self, model: &str) -> &[FieldEntry] {
        self.models
            .get(model)
            .map(|entry| entry.fields.as_slice())
            .unwrap_or_default()
    }

    fn field(&self, model: &str, field: &str) -> EnumResult<&FieldEntry> {
        self.models
            .get(model)
            .and_then(|entry| entry.field(field))
            .ok_or_else(|| EnumError::unknown_field(model, field))
    }

    pub fn declaration(&self, model: &str, field: &str) -> EnumResult<&EnumDeclaration> {
        self.field(model, field).map(|entry| &entry.declaration)
    }

    /// Rules attached to `field`; empty when validation was disabled.
    pub fn rules(&self, model: &str, field: &str) -> EnumResult<&[EnumRule]> {
        self.field(model, field).map(|entry| entry.rules.as_slice())
    }

    /// Key whose label equals `value`, first in declaration order on ties.
    ///
    /// `Ok(None)` means the field exists but no label matched.
    pub fn lookup_key_for_value(
        &self,
        model: &str,
        field: &str,
        value: impl Into<EnumLabel>,
    ) -> EnumResult<Option<&EnumKey>> {
        let value = value.into();
        self.field(model, field)
            .map(|entry| entry.declaration.values().key_for(&value))
    }

    /// Label stored under `key`, compared by string coercion.
    ///
    /// `Ok(None)` means the field exists but has no such key.
    pub fn lookup_value_for_key(
        &self,
        model: &str,
        field: &str,
        key: impl Into<EnumKey>,
    ) -> EnumResult<Option<&EnumLabel>> {
        let key = key.into();
        self.field(model, field)
            .map(|entry| entry.declaration.values().label_for(&key))
    }

    /// Humanized, translated label sets of every non-empty enum field, keyed
    /// by presentation name. Unknown models yield an empty set.
    pub fn all_label_sets(&self, model: &str) -> LabelSets {
        let mut sets = LabelSets::default();
        for entry in self.fields(model) {
            let values = entry.declaration.values();
            if values.is_empty() {
                continue;
            }

            let labels = values
                .iter()
                .map(|(key, label)| {
                    let text = self.translator.translate(&self.inflector.humanize(&label.to_string()));
                    (key.clone(), text)
                })
                .collect();

            sets.insert(LabelSet {
                name: self.inflector.presentation_name(&entry.name),
                field: entry.name.clone(),
                labels,
            });
        }
        sets
    }

    /// Evaluates every attached rule of `model` against a submitted record.
    ///
    /// Intended for hosts without their own rule engine; the registry does not
    /// call this during registration or lookups.
    pub fn check(&self, model: &str, record: &Map<String, Value>, phase: SavePhase) -> EnumResult<()> {
        let mut issues = Vec::new();

        for entry in self.fields(model) {
            let raw = record.get(&entry.name);
            let text = raw.map(submitted_text);
            let value = match (raw, text.as_deref()) {
                (Some(Value::Null), _) => SubmittedValue::Null,
                (Some(_), Some(text)) => SubmittedValue::Text(text),
                _ => SubmittedValue::Missing,
            };

            for rule in &entry.rules {
                if let Err(issue) = rule.check(&entry.name, value, phase) {
                    issues.push(issue);
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues).into())
        }
    }
}

/// String form of a submitted JSON value, the way a form post would carry it.
fn submitted_text(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Display labels of one enum field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    /// Presentation name, e.g. `userStatuses` for `user_status`.
    pub name: String,
    pub field: String,
    /// Key with its humanized, translated label, in declaration order.
    pub labels: Vec<(EnumKey, String)>,
}

/// Ordered presentation name → label set mapping.
///
/// Serializes as a JSON object of objects: `{"statuses": {"1": "Active"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSets {
    sets: Vec<LabelSet>,
}

impl LabelSets {
    /// A later set with the same presentation name replaces the earlier one
    /// in place.
    fn insert(&mut self, set: LabelSet) {
        match self.sets.iter_mut().find(|existing| existing.name == set.name) {
            Some(existing) => *existing = set,
            None => self.sets.push(set),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LabelSet> {
        self.sets.iter().find(|set| set.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelSet> {
        self.sets.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl<'a> IntoIterator for &'a LabelSets {
    type Item = &'a LabelSet;
    type IntoIter = std::slice::Iter<'a, LabelSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}

impl Serialize for LabelSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (key, label) in &self.labels {
            map.serialize_entry(&key.coerce(), label)?;
        }
        map.end()
    }
}

impl Serialize for LabelSets {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.sets.len()))?;
        for set in &self.sets {
            map.serialize_entry(&set.name, set)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumValues;
    use serde_json::json;

    fn article_registry() -> EnumRegistry {
        let mut registry = EnumRegistry::new();
        registry
            .register(
                "Article",
                [
                    ("status", json!({"1": "active", "2": "inactive"})),
                    ("visibility", json!({"values": {"public": "public", "hidden": "hidden"}, "validate": false})),
                    ("empty_field", json!({})),
                ],
                &ColumnNullability::from([("status".to_string(), false)]),
            )
            .unwrap();
        registry
    }

    #[test]
    fn lookups_round_trip() {
        let registry = article_registry();
        assert_eq!(
            registry.lookup_value_for_key("Article", "status", 1).unwrap(),
            Some(&EnumLabel::from("active"))
        );
        assert_eq!(
            registry.lookup_key_for_value("Article", "status", "inactive").unwrap(),
            Some(&EnumKey::Int(2))
        );
        assert_eq!(
            registry.lookup_value_for_key("Article", "status", "2").unwrap(),
            Some(&EnumLabel::from("inactive"))
        );
    }

    #[test]
    fn missing_entries_are_none_not_errors() {
        let registry = article_registry();
        assert_eq!(registry.lookup_key_for_value("Article", "status", "archived").unwrap(), None);
        assert_eq!(registry.lookup_value_for_key("Article", "status", 0).unwrap(), None);
    }

    #[test]
    fn unknown_field_or_model_is_an_error() {
        let registry = article_registry();
        assert!(matches!(
            registry.lookup_key_for_value("Article", "kind", "x"),
            Err(EnumError::UnknownField { .. })
        ));
        assert!(matches!(
            registry.lookup_value_for_key("Comment", "status", 1),
            Err(EnumError::UnknownField { .. })
        ));
    }

    #[test]
    fn validate_false_registers_without_rules() {
        let registry = article_registry();
        assert!(registry.rules("Article", "visibility").unwrap().is_empty());
        assert_eq!(
            registry.lookup_key_for_value("Article", "visibility", "hidden").unwrap(),
            Some(&EnumKey::from("hidden"))
        );
        assert_eq!(registry.rules("Article", "status").unwrap().len(), 2);
    }

    #[test]
    fn label_sets_skip_empty_fields_and_keep_order() {
        let registry = article_registry();
        let sets = registry.all_label_sets("Article");
        assert_eq!(sets.names().collect::<Vec<_>>(), vec!["statuses", "visibilities"]);

        let statuses = sets.get("statuses").unwrap();
        assert_eq!(statuses.field, "status");
        assert_eq!(
            statuses.labels,
            vec![(EnumKey::Int(1), "Active".to_string()), (EnumKey::Int(2), "Inactive".to_string())]
        );
    }

    #[test]
    fn label_sets_serialize_as_nested_objects() {
        let registry = article_registry();
        let json = serde_json::to_value(registry.all_label_sets("Article")).unwrap();
        assert_eq!(
            json,
            json!({
                "statuses": {"1": "Active", "2": "Inactive"},
                "visibilities": {"public": "Public", "hidden": "Hidden"}
            })
        );
    }

    #[test]
    fn unknown_model_has_no_label_sets() {
        assert!(EnumRegistry::new().all_label_sets("Nothing").is_empty());
    }

    #[test]
    fn label_sets_use_the_translator() {
        let mut registry = EnumRegistry::new().with_translator(|text: &str| format!("[{text}]"));
        let values = EnumValues::new([(1, "draft")]).unwrap();
        registry
            .register("Post", [("state", values)], &ColumnNullability::new())
            .unwrap();
        let sets = registry.all_label_sets("Post");
        assert_eq!(sets.get("states").unwrap().labels[0].1, "[Draft]");
    }

    #[test]
    fn bad_field_does_not_block_the_others() {
        let mut registry = EnumRegistry::new();
        let err = registry
            .register(
                "Article",
                [
                    ("status", json!({"1": "active"})),
                    ("broken", json!({"values": "x", "validate": "y"})),
                    ("kind", json!(["news", "opinion"])),
                ],
                &ColumnNullability::new(),
            )
            .unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["broken"]);
        assert!(registry.lookup_value_for_key("Article", "status", 1).is_ok());
        assert!(registry.lookup_value_for_key("Article", "kind", 0).is_ok());
        assert!(registry.lookup_value_for_key("Article", "broken", 0).is_err());
    }

    #[test]
    fn duplicate_field_names_are_reported() {
        let mut registry = EnumRegistry::new();
        let err = registry
            .register(
                "Article",
                [("status", json!({"1": "a"})), ("status", json!({"2": "b"}))],
                &ColumnNullability::new(),
            )
            .unwrap_err();
        assert_eq!(err.issues[0].message, "field declared more than once");
        assert_eq!(
            registry.lookup_value_for_key("Article", "status", 1).unwrap(),
            Some(&EnumLabel::from("a"))
        );
    }

    #[test]
    fn reregistration_replaces_and_dispose_removes() {
        let mut registry = article_registry();
        registry
            .register("Article", [("kind", json!({"a": "A"}))], &ColumnNullability::new())
            .unwrap();
        assert!(registry.lookup_value_for_key("Article", "status", 1).is_err());
        assert!(registry.lookup_value_for_key("Article", "kind", "a").is_ok());

        assert!(registry.dispose("Article"));
        assert!(!registry.is_registered("Article"));
        assert!(!registry.dispose("Article"));
    }

    #[test]
    fn check_reports_rule_failures() {
        let registry = article_registry();
        let record = json!({"status": 3, "visibility": "secret"});
        let err = registry
            .check("Article", record.as_object().unwrap(), SavePhase::Update)
            .unwrap_err();
        match err {
            EnumError::Validation(validation) => {
                assert_eq!(validation.issues.len(), 1);
                assert_eq!(validation.issues[0].field, "status");
                assert_eq!(validation.issues[0].code, "enum.not_allowed");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let ok = json!({"status": 1});
        assert!(registry.check("Article", ok.as_object().unwrap(), SavePhase::Create).is_ok());
        let missing = json!({});
        assert!(registry.check("Article", missing.as_object().unwrap(), SavePhase::Create).is_err());
        assert!(registry.check("Article", missing.as_object().unwrap(), SavePhase::Update).is_ok());
    }
}
