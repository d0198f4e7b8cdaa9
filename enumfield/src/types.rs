use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Stored key of an enum entry.
///
/// Strings holding the canonical decimal form of an `i64` normalize to `Int`
/// when built through `From`, so `1` and `"1"` are the same key. Equality and
/// hashing go through the string coercion regardless of how the key was built.
#[derive(Debug, Clone)]
pub enum EnumKey {
    Int(i64),
    Str(String),
}

impl EnumKey {
    /// String form used for allowed-value sets and key comparison.
    pub fn coerce(&self) -> String {
        self.to_string()
    }

    fn parse_canonical_int(raw: &str) -> Option<i64> {
        raw.parse::<i64>().ok().filter(|n| n.to_string() == raw)
    }
}

impl fmt::Display for EnumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumKey::Int(value) => write!(f, "{value}"),
            EnumKey::Str(value) => f.write_str(value),
        }
    }
}

impl PartialEq for EnumKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EnumKey::Int(a), EnumKey::Int(b)) => a == b,
            (EnumKey::Str(a), EnumKey::Str(b)) => a == b,
            _ => self.coerce() == other.coerce(),
        }
    }
}

impl Eq for EnumKey {}

impl Hash for EnumKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coerce().hash(state);
    }
}

impl From<i64> for EnumKey {
    fn from(value: i64) -> Self {
        EnumKey::Int(value)
    }
}

impl From<i32> for EnumKey {
    fn from(value: i32) -> Self {
        EnumKey::Int(i64::from(value))
    }
}

impl From<u32> for EnumKey {
    fn from(value: u32) -> Self {
        EnumKey::Int(i64::from(value))
    }
}

impl From<&str> for EnumKey {
    fn from(value: &str) -> Self {
        match EnumKey::parse_canonical_int(value) {
            Some(n) => EnumKey::Int(n),
            None => EnumKey::Str(value.to_string()),
        }
    }
}

impl From<String> for EnumKey {
    fn from(value: String) -> Self {
        match EnumKey::parse_canonical_int(&value) {
            Some(n) => EnumKey::Int(n),
            None => EnumKey::Str(value),
        }
    }
}

impl Serialize for EnumKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            EnumKey::Int(value) => serializer.serialize_i64(*value),
            EnumKey::Str(value) => serializer.serialize_str(value),
        }
    }
}

impl<'de> Deserialize<'de> for EnumKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawKey {
            Int(i64),
            Str(String),
        }

        Ok(match RawKey::deserialize(deserializer)? {
            RawKey::Int(value) => EnumKey::Int(value),
            RawKey::Str(value) => EnumKey::from(value),
        })
    }
}

/// Display label of an enum entry. `None` is the literal null label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumLabel(Option<String>);

impl EnumLabel {
    pub fn null() -> Self {
        Self(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Null or the empty string.
    #[inline]
    pub fn is_empty_marker(&self) -> bool {
        self.0.as_deref().is_none_or(str::is_empty)
    }
}

impl fmt::Display for EnumLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or(""))
    }
}

impl From<&str> for EnumLabel {
    fn from(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<String> for EnumLabel {
    fn from(value: String) -> Self {
        Self(Some(value))
    }
}

impl From<Option<&str>> for EnumLabel {
    fn from(value: Option<&str>) -> Self {
        Self(value.map(str::to_string))
    }
}

impl From<Option<String>> for EnumLabel {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate enum key '{0}'")]
pub struct DuplicateKey(pub EnumKey);

/// Ordered key→label entries of one enum field. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnumValues {
    entries: Vec<(EnumKey, EnumLabel)>,
}

impl EnumValues {
    /// Builds the entry list, rejecting keys that coerce to the same string.
    pub fn new<I, K, L>(entries: I) -> Result<Self, DuplicateKey>
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<EnumKey>,
        L: Into<EnumLabel>,
    {
        let mut values = Self::default();
        for (key, label) in entries {
            values.push(key.into(), label.into())?;
        }
        Ok(values)
    }

    pub(crate) fn push(&mut self, key: EnumKey, label: EnumLabel) -> Result<(), DuplicateKey> {
        if self.entries.iter().any(|(existing, _)| *existing == key) {
            return Err(DuplicateKey(key));
        }
        self.entries.push((key, label));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EnumKey, &EnumLabel)> {
        self.entries.iter().map(|(key, label)| (key, label))
    }

    pub fn keys(&self) -> impl Iterator<Item = &EnumKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn labels(&self) -> impl Iterator<Item = &EnumLabel> {
        self.entries.iter().map(|(_, label)| label)
    }

    pub fn label_for(&self, key: &EnumKey) -> Option<&EnumLabel> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, label)| label)
    }

    /// First key in declaration order whose label equals `label`.
    pub fn key_for(&self, label: &EnumLabel) -> Option<&EnumKey> {
        self.entries
            .iter()
            .find(|(_, candidate)| candidate == label)
            .map(|(key, _)| key)
    }

    /// Every key coerced to its string form, in declaration order.
    pub fn allowed_strings(&self) -> Vec<String> {
        self.keys().map(EnumKey::coerce).collect()
    }

    /// True when a label (not a key) is null or the empty string.
    pub fn allows_empty(&self) -> bool {
        self.labels().any(EnumLabel::is_empty_marker)
    }
}

/// A resolved enum declaration for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumDeclaration {
    /// Plain key→label mapping; always validated.
    Bare { values: EnumValues },
    /// `{ values, validate }` form. `validate: None` behaves like `Some(true)`.
    Wrapped {
        values: EnumValues,
        validate: Option<bool>,
    },
}

impl EnumDeclaration {
    pub fn bare(values: EnumValues) -> Self {
        EnumDeclaration::Bare { values }
    }

    pub fn wrapped(values: EnumValues, validate: Option<bool>) -> Self {
        EnumDeclaration::Wrapped { values, validate }
    }

    pub fn values(&self) -> &EnumValues {
        match self {
            EnumDeclaration::Bare { values } | EnumDeclaration::Wrapped { values, .. } => values,
        }
    }

    /// Whether a validation rule should be attached for this field.
    pub fn validates(&self) -> bool {
        match self {
            EnumDeclaration::Bare { .. } => true,
            EnumDeclaration::Wrapped { validate, .. } => validate.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_numeric_string_keys_coerce_identically() {
        assert_eq!(EnumKey::from(1).coerce(), "1");
        assert_eq!(EnumKey::from("1").coerce(), "1");
        assert_eq!(EnumKey::from(1), EnumKey::from("1"));
        assert_eq!(EnumKey::Int(1), EnumKey::Str("1".to_string()));
        assert!(matches!(EnumKey::from("1"), EnumKey::Int(1)));
    }

    #[test]
    fn non_canonical_numeric_strings_stay_strings() {
        assert!(matches!(EnumKey::from("01"), EnumKey::Str(_)));
        assert!(matches!(EnumKey::from("+1"), EnumKey::Str(_)));
        assert!(matches!(EnumKey::from("-4"), EnumKey::Int(-4)));
        assert_ne!(EnumKey::from("01"), EnumKey::from(1));
    }

    #[test]
    fn duplicate_coerced_keys_are_rejected() {
        let err = EnumValues::new([(EnumKey::from(1), "a"), (EnumKey::from("1"), "b")]).unwrap_err();
        assert_eq!(err.to_string(), "duplicate enum key '1'");
    }

    #[test]
    fn key_for_returns_first_key_on_duplicate_labels() {
        let values = EnumValues::new([(3, "same"), (1, "same"), (2, "other")]).unwrap();
        assert_eq!(values.key_for(&EnumLabel::from("same")), Some(&EnumKey::Int(3)));
    }

    #[test]
    fn allows_empty_inspects_labels_not_keys() {
        let empty_key = EnumValues::new([("", "none"), ("x", "set")]).unwrap();
        assert!(!empty_key.allows_empty());

        let empty_label = EnumValues::new([("a", "")]).unwrap();
        assert!(empty_label.allows_empty());

        let null_label = EnumValues::new([(EnumKey::from("a"), EnumLabel::null())]).unwrap();
        assert!(null_label.allows_empty());
    }

    #[test]
    fn wrapped_validate_is_tri_state() {
        let values = EnumValues::new([(1, "a")]).unwrap();
        assert!(EnumDeclaration::bare(values.clone()).validates());
        assert!(EnumDeclaration::wrapped(values.clone(), None).validates());
        assert!(EnumDeclaration::wrapped(values.clone(), Some(true)).validates());
        assert!(!EnumDeclaration::wrapped(values, Some(false)).validates());
    }

    #[test]
    fn keys_serialize_in_their_native_shape() {
        let values = EnumValues::new([(EnumKey::from(1), "a"), (EnumKey::from("key"), "b")]).unwrap();
        let json = serde_json::to_value(values.keys().collect::<Vec<_>>()).unwrap();
        assert_eq!(json, serde_json::json!([1, "key"]));
    }
}
