//! Translation and naming collaborators.
//!
//! The registry never translates or inflects on its own; it calls out to a
//! [`Translator`] and an [`Inflector`] supplied at construction.

use std::collections::HashMap;

/// Message translation service.
pub trait Translator {
    fn translate(&self, text: &str) -> String;
}

/// Returns every message unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Looks messages up in a fixed catalog, falling back to the input.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    catalog: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn new(catalog: HashMap<String, String>) -> Self {
        Self { catalog }
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, text: &str) -> String {
        self.catalog
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}

impl<F> Translator for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, text: &str) -> String {
        self(text)
    }
}

/// Naming transformations applied to labels and field names.
pub trait Inflector {
    /// `"not_set"` -> `"Not Set"`
    fn humanize(&self, token: &str) -> String;

    /// `"user_status"` -> `"userStatus"`
    fn variable(&self, field: &str) -> String;

    /// `"userStatus"` -> `"userStatuses"`
    fn pluralize(&self, word: &str) -> String;

    /// Grouping key used when exposing a field's labels to a display layer.
    fn presentation_name(&self, field: &str) -> String {
        self.pluralize(&self.variable(field))
    }
}

/// Built-in English inflection rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInflector;

impl Inflector for DefaultInflector {
    fn humanize(&self, token: &str) -> String {
        token
            .replace('_', " ")
            .split(' ')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn variable(&self, field: &str) -> String {
        let camel: String = field.split('_').map(capitalize).collect();
        lower_first(&camel)
    }

    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
            format!("{word}es")
        } else if word.ends_with('y')
            && !word.ends_with("ay")
            && !word.ends_with("ey")
            && !word.ends_with("oy")
            && !word.ends_with("uy")
        {
            format!("{}ies", &word[..word.len() - 1])
        } else {
            format!("{word}s")
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
