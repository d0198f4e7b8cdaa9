use enumfield::{EnumConfig, EnumError, EnumKey, EnumLabel, SavePhase};
use serde_json::json;
use std::fs;

const TOML_CONFIG: &str = r#"
[translations]
"Please choose one of the following values : %s" = "Choisissez une valeur : %s"
"Published" = "Publié"

[models.Article.enums]
status = { 0 = "draft", 1 = "published" }
visibility = { values = { public = "public", private = "private" }, validate = false }
legacy_kind = ["news", "review"]

[models.Article.nullable]
status = false

[models.Comment.enums]
moderation = { values = { ok = "approved", ko = "rejected", "" = "" } }
"#;

#[test]
fn loads_toml_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enums.toml");
    fs::write(&path, TOML_CONFIG).unwrap();

    let registry = EnumConfig::load(&path).unwrap().registry().unwrap();
    assert_eq!(registry.models(), vec!["Article", "Comment"]);

    assert_eq!(
        registry.lookup_key_for_value("Article", "status", "published").unwrap(),
        Some(&EnumKey::Int(1))
    );
    assert_eq!(
        registry.lookup_value_for_key("Article", "legacy_kind", 1).unwrap(),
        Some(&EnumLabel::from("review"))
    );

    let rules = registry.rules("Article", "status").unwrap();
    assert_eq!(rules[0].message, "Choisissez une valeur : Draft, Publié");

    let moderation = registry.rules("Comment", "moderation").unwrap();
    assert_eq!(moderation.len(), 1);
    assert!(moderation[0].allow_empty);
}

#[test]
fn label_sets_follow_document_order_and_translations() {
    let config = EnumConfig::from_toml_str(TOML_CONFIG).unwrap();
    let registry = config.registry().unwrap();

    let json = serde_json::to_value(registry.all_label_sets("Article")).unwrap();
    assert_eq!(
        json,
        json!({
            "statuses": {"0": "Draft", "1": "Publié"},
            "visibilities": {"public": "Public", "private": "Private"},
            "legacyKinds": {"0": "News", "1": "Review"}
        })
    );
    let names: Vec<_> = registry.all_label_sets("Article").names().map(str::to_string).collect();
    assert_eq!(names, vec!["statuses", "visibilities", "legacyKinds"]);
}

#[test]
fn loads_json_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enums.json");
    fs::write(
        &path,
        r#"{"models": {"User": {"enums": {"role": {"2": "editor", "1": "admin"}}, "nullable": {"role": false}}}}"#,
    )
    .unwrap();

    let registry = EnumConfig::load(&path).unwrap().registry().unwrap();
    let rules = registry.rules("User", "role").unwrap();
    assert_eq!(rules[0].allowed, vec!["2", "1"]);
    assert!(rules[0].required);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EnumConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, EnumError::Io(_)));
}

#[test]
fn malformed_toml_is_reported() {
    let err = EnumConfig::from_toml_str("[models.Article.enums\nstatus = 1").unwrap_err();
    assert!(matches!(err, EnumError::Toml(_)));
}

#[test]
fn rejected_declarations_do_not_block_the_model() {
    let config = EnumConfig::from_toml_str(
        r#"
[models.Article.enums]
status = { 1 = "active" }
broken = { values = "x", validate = "y" }
flags = { validate = true }
"#,
    )
    .unwrap();

    let (registry, issues) = config.build_registry();
    let fields: Vec<_> = issues.iter().map(|issue| issue.field.as_str()).collect();
    assert_eq!(fields, vec!["Article.broken", "Article.flags"]);
    assert!(registry.lookup_value_for_key("Article", "status", 1).is_ok());

    match config.registry() {
        Err(EnumError::Configuration(err)) => assert_eq!(err.issues.len(), 2),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn loaded_rules_check_records() {
    let registry = EnumConfig::from_toml_str(TOML_CONFIG).unwrap().registry().unwrap();

    let record = json!({"status": "1", "visibility": "anything"});
    assert!(registry.check("Article", record.as_object().unwrap(), SavePhase::Create).is_ok());

    let record = json!({"visibility": "public"});
    match registry.check("Article", record.as_object().unwrap(), SavePhase::Create) {
        Err(EnumError::Validation(err)) => {
            assert_eq!(err.issues.len(), 1);
            assert_eq!(err.issues[0].field, "status");
            assert_eq!(err.issues[0].code, "enum.required");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
