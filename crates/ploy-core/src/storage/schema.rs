//! Document shape checks and schema migrations
//!
//! Validation is shallow on purpose: it checks the root shape only and
//! leaves entity-level defects to the typed models, which fill in defaults.
//!
//! Migrations run on the raw JSON value before it is turned into a
//! [`Document`](crate::Document). Each step applies to exactly one input
//! version and produces the next one.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::document::DocumentError;

/// Current schema version for migrations
pub const SCHEMA_VERSION: u32 = 2;

/// Collections that every loadable document must carry as arrays
const REQUIRED_ARRAYS: [&str; 4] = ["projects", "ideas", "logs", "wins"];

/// One migration step from `from` to `from + 1`
struct Migration {
    from: u32,
    apply: fn(&mut Map<String, Value>),
}

const MIGRATIONS: &[Migration] = &[Migration {
    from: 1,
    apply: add_reflections_and_tag_lists,
}];

/// Check the root shape of a document
pub fn validate(value: &Value) -> Result<(), DocumentError> {
    let Some(doc) = value.as_object() else {
        return Err(invalid("must be an object"));
    };

    let version = doc.get("version").or_else(|| doc.get("schemaVersion"));
    match version {
        None | Some(Value::Null) => return Err(invalid("missing version")),
        Some(v) if parse_version(v).is_none() => {
            return Err(invalid("version must be a positive integer"))
        }
        Some(_) => {}
    }

    for key in REQUIRED_ARRAYS {
        if !doc.get(key).is_some_and(Value::is_array) {
            return Err(invalid(&format!("{} must be an array", key)));
        }
    }

    if !doc.get("settings").is_some_and(Value::is_object) {
        return Err(invalid("invalid settings"));
    }

    Ok(())
}

/// Bring a document up to [`SCHEMA_VERSION`]
///
/// A missing version is treated as version 1. Documents written by a newer
/// schema are left untouched. Non-object values are returned unchanged.
pub fn migrate(value: Value) -> Value {
    let Value::Object(mut doc) = value else {
        return value;
    };

    if let Some(legacy) = doc.remove("schemaVersion") {
        doc.entry("version").or_insert(legacy);
    }

    let mut version = doc.get("version").and_then(parse_version).unwrap_or(1);
    doc.insert("version".to_string(), json!(version));

    while version < SCHEMA_VERSION {
        let Some(step) = MIGRATIONS.iter().find(|m| m.from == version) else {
            break;
        };
        debug!("Migrating document from schema v{} to v{}", version, version + 1);
        (step.apply)(&mut doc);
        version += 1;
        doc.insert("version".to_string(), json!(version));
    }

    Value::Object(doc)
}

/// Whether a stored document predates the current schema
pub fn needs_migration(value: &Value) -> bool {
    value
        .get("version")
        .and_then(parse_version)
        .map_or(true, |v| v < SCHEMA_VERSION)
}

fn parse_version(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

fn invalid(reason: &str) -> DocumentError {
    DocumentError::Invalid(reason.to_string())
}

/// v1 -> v2: quarterly reflections and settings tag lists are always present
fn add_reflections_and_tag_lists(doc: &mut Map<String, Value>) {
    if !doc
        .get("quarterlyReflections")
        .is_some_and(Value::is_array)
    {
        doc.insert("quarterlyReflections".to_string(), json!([]));
    }

    if let Some(Value::Object(settings)) = doc.get_mut("settings") {
        for key in ["strengths", "supportNeeds"] {
            if !settings.get(key).is_some_and(Value::is_array) {
                settings.insert(key.to_string(), json!([]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(version: Value) -> Value {
        json!({
            "version": version,
            "projects": [],
            "ideas": [],
            "logs": [],
            "wins": [],
            "settings": {}
        })
    }

    fn reason(value: &Value) -> String {
        match validate(value) {
            Err(DocumentError::Invalid(reason)) => reason,
            other => panic!("expected invalid document, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_minimal() {
        assert!(validate(&minimal(json!(1))).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_object() {
        assert_eq!(reason(&json!([1, 2])), "must be an object");
        assert_eq!(reason(&json!("doc")), "must be an object");
    }

    #[test]
    fn test_validate_rejects_missing_version() {
        let mut doc = minimal(json!(1));
        doc.as_object_mut().unwrap().remove("version");
        assert_eq!(reason(&doc), "missing version");
    }

    #[test]
    fn test_validate_rejects_bad_version() {
        assert_eq!(reason(&minimal(json!(0))), "version must be a positive integer");
        assert_eq!(reason(&minimal(json!("2"))), "version must be a positive integer");
        assert_eq!(reason(&minimal(json!(-1))), "version must be a positive integer");
    }

    #[test]
    fn test_validate_accepts_schema_version_alias() {
        let mut doc = minimal(json!(1));
        let obj = doc.as_object_mut().unwrap();
        obj.remove("version");
        obj.insert("schemaVersion".to_string(), json!(2));
        assert!(validate(&doc).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_array_collections() {
        for key in REQUIRED_ARRAYS {
            let mut doc = minimal(json!(1));
            doc[key] = json!({});
            assert_eq!(reason(&doc), format!("{} must be an array", key));
        }
    }

    #[test]
    fn test_validate_rejects_missing_settings() {
        let mut doc = minimal(json!(1));
        doc.as_object_mut().unwrap().remove("settings");
        assert_eq!(reason(&doc), "invalid settings");

        doc["settings"] = json!([]);
        assert_eq!(reason(&doc), "invalid settings");
    }

    #[test]
    fn test_migrate_missing_version_coerces_to_one_then_steps() {
        let mut doc = minimal(json!(1));
        doc.as_object_mut().unwrap().remove("version");
        let migrated = migrate(doc);
        assert_eq!(migrated["version"], SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_v1_to_v2() {
        let mut doc = minimal(json!(1));
        doc["settings"]["strengths"] = json!(["patience"]);

        let migrated = migrate(doc);
        assert_eq!(migrated["version"], 2);
        assert_eq!(migrated["quarterlyReflections"], json!([]));
        assert_eq!(migrated["settings"]["strengths"], json!(["patience"]));
        assert_eq!(migrated["settings"]["supportNeeds"], json!([]));
        assert!(validate(&migrated).is_ok());
    }

    #[test]
    fn test_migrate_keeps_existing_reflections() {
        let mut doc = minimal(json!(1));
        doc["quarterlyReflections"] = json!([{"id": "q1"}]);
        let migrated = migrate(doc);
        assert_eq!(migrated["quarterlyReflections"][0]["id"], "q1");
    }

    #[test]
    fn test_migrate_current_is_noop() {
        let doc = minimal(json!(SCHEMA_VERSION));
        assert_eq!(migrate(doc.clone()), doc);
    }

    #[test]
    fn test_migrate_future_version_untouched() {
        let doc = minimal(json!(SCHEMA_VERSION + 5));
        assert_eq!(migrate(doc.clone()), doc);
    }

    #[test]
    fn test_migrate_moves_schema_version_key() {
        let mut doc = minimal(json!(1));
        let obj = doc.as_object_mut().unwrap();
        obj.remove("version");
        obj.insert("schemaVersion".to_string(), json!(1));

        let migrated = migrate(doc);
        assert!(migrated.get("schemaVersion").is_none());
        assert_eq!(migrated["version"], SCHEMA_VERSION);
    }

    #[test]
    fn test_needs_migration() {
        assert!(needs_migration(&minimal(json!(1))));
        assert!(!needs_migration(&minimal(json!(SCHEMA_VERSION))));
    }
}
