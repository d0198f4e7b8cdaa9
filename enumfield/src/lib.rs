//! Enumerated model fields.
//!
//! A model declares some of its fields as enums (a fixed set of key→label
//! pairs). The [`EnumRegistry`] keeps those declarations per model and offers
//! key↔label lookups, presentation label sets for selection controls, and
//! derived "value must be one of the keys" rules for the host's validation
//! layer.
//!
//! ```
//! use enumfield::{ColumnNullability, EnumRegistry};
//! use serde_json::json;
//!
//! let mut registry = EnumRegistry::new();
//! registry
//!     .register(
//!         "Article",
//!         [("status", json!({"1": "active", "2": "inactive"}))],
//!         &ColumnNullability::from([("status".to_string(), false)]),
//!     )
//!     .unwrap();
//!
//! let label = registry.lookup_value_for_key("Article", "status", 2).unwrap();
//! assert_eq!(label.and_then(|label| label.as_str()), Some("inactive"));
//! assert_eq!(registry.rules("Article", "status").unwrap().len(), 2);
//! ```

pub mod config;
pub mod declaration;
pub mod errors;
pub mod inflector;
pub mod registry;
pub mod rules;
pub mod types;

pub use config::{EnumConfig, ModelConfig};
pub use declaration::{IntoDeclaration, parse_declaration};
pub use errors::*;
pub use inflector::{CatalogTranslator, DefaultInflector, IdentityTranslator, Inflector, Translator};
pub use registry::{ColumnNullability, EnumRegistry, FieldEntry, LabelSet, LabelSets};
pub use rules::{EnumRule, RuleScope, SavePhase, SubmittedValue};
pub use types::{DuplicateKey, EnumDeclaration, EnumKey, EnumLabel, EnumValues};
