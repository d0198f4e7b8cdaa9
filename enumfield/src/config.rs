//! File-based enum declarations.
//!
//! ```toml
//! [translations]
//! "Active" = "Actif"
//!
//! [models.Article.enums]
//! status = { 1 = "active", 2 = "inactive" }
//! visibility = { values = { public = "public", hidden = "hidden" }, validate = false }
//!
//! [models.Article.nullable]
//! status = false
//! ```
//!
//! Field and key order follow the document.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ConfigurationError, ConfigurationIssue, EnumResult};
use crate::inflector::CatalogTranslator;
use crate::registry::{ColumnNullability, EnumRegistry};

/// Root of an enum configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumConfig {
    /// Message catalog handed to a [`CatalogTranslator`].
    #[serde(default)]
    pub translations: HashMap<String, String>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Raw declarations by field name, decoded at registration.
    #[serde(default)]
    pub enums: Map<String, Value>,
    /// Column nullability by field name; missing fields count as nullable.
    #[serde(default)]
    pub nullable: ColumnNullability,
}

impl EnumConfig {
    pub fn from_toml_str(content: &str) -> EnumResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> EnumResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Loads a config file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> EnumResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        log::debug!("loading enum config from {}", path.display());
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Registers every model, collecting rejected fields as `Model.field` issues.
    pub fn build_registry(&self) -> (EnumRegistry, Vec<ConfigurationIssue>) {
        let mut registry = EnumRegistry::new().with_translator(CatalogTranslator::new(self.translations.clone()));
        let mut issues = Vec::new();

        for (model, config) in &self.models {
            let fields = config.enums.iter().map(|(field, raw)| (field.as_str(), raw));
            if let Err(err) = registry.register(model, fields, &config.nullable) {
                issues.extend(
                    err.issues
                        .into_iter()
                        .map(|issue| ConfigurationIssue::new(format!("{model}.{}", issue.field), issue.message)),
                );
            }
        }

        (registry, issues)
    }

    /// Like [`build_registry`](Self::build_registry) but fails on any rejected field.
    pub fn registry(&self) -> EnumResult<EnumRegistry> {
        let (registry, issues) = self.build_registry();
        if issues.is_empty() {
            Ok(registry)
        } else {
            Err(ConfigurationError::new(issues).into())
        }
    }
}
