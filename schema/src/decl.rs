//! Serializable schema declarations.
//!
//! A declaration is an ordered list of fields, so the compact identifiers of a
//! schema loaded from JSON match the ones of the same schema built in code.
//!
//! ```json
//! { "fields": [
//!     { "name": "user_id", "type": "string" },
//!     { "name": "page", "type": "int", "default": 0 },
//!     { "name": "mode", "type": "choice", "options": ["solo", "team"] }
//! ] }
//! ```

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{FieldError, FieldResult, SchemaError, SchemaResult};
use crate::field::{from_unix_seconds, unix_seconds, FieldDef, FieldKind, FieldValue};
use crate::{ChoiceOptions, Schema};

/// Serializable form of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDecl {
    pub fields: Vec<FieldDecl>,
}

/// Serializable form of one named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKindDecl,
}

/// Variant and default of a declared field. Timestamps are Unix seconds.
///
/// Keys other than `type`, `default` and (for choices) `options` are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum FieldKindDecl {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<i64>,
    },
    Boolean {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<bool>,
    },
    List {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<Vec<String>>,
    },
    Choice {
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    Timestamp {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<i64>,
    },
}

impl FieldKindDecl {
    fn into_def(self) -> SchemaResult<FieldDef> {
        let def = match self {
            Self::String { default } => with_default(FieldDef::string(), default),
            Self::Int { default } => with_default(FieldDef::int(), default),
            Self::Boolean { default } => with_default(FieldDef::boolean(), default),
            Self::List { default } => with_default(FieldDef::list(), default),
            Self::Choice { options, default } => with_default(
                FieldDef::new(FieldKind::Choice(ChoiceOptions::new(options)?)),
                default.map(FieldValue::Choice),
            ),
            Self::Timestamp { default } => {
                let default = default
                    .map(from_unix_seconds)
                    .transpose()
                    .map_err(|source| SchemaError::InvalidDefault {
                        field: String::new(),
                        source,
                    })?;
                with_default(FieldDef::timestamp(), default)
            }
        };
        Ok(def)
    }

    fn try_from_def(def: &FieldDef) -> FieldResult<Self> {
        let FieldDef { kind, default } = def.clone();
        let decl = match kind {
            FieldKind::String => Self::String {
                default: match default {
                    Some(FieldValue::String(text)) => Some(text),
                    _ => None,
                },
            },
            FieldKind::Int => Self::Int {
                default: match default {
                    Some(FieldValue::Int(int)) => Some(int),
                    _ => None,
                },
            },
            FieldKind::Boolean => Self::Boolean {
                default: match default {
                    Some(FieldValue::Boolean(flag)) => Some(flag),
                    _ => None,
                },
            },
            FieldKind::List => Self::List {
                default: match default {
                    Some(FieldValue::List(items)) => Some(items),
                    _ => None,
                },
            },
            FieldKind::Choice(options) => Self::Choice {
                options: options.names().map(str::to_string).collect(),
                default: match default {
                    Some(FieldValue::Choice(option)) => Some(option),
                    _ => None,
                },
            },
            FieldKind::Timestamp => Self::Timestamp {
                default: match default {
                    Some(value @ FieldValue::Timestamp(time)) => {
                        def.validate_default(&value)?;
                        Some(unix_seconds(time)?)
                    }
                    _ => None,
                },
            },
        };
        Ok(decl)
    }
}

fn with_default<T: Into<FieldValue>>(def: FieldDef, default: Option<T>) -> FieldDef {
    match default {
        Some(value) => def.with_default(value),
        None => def,
    }
}

impl TryFrom<SchemaDecl> for Schema {
    type Error = SchemaError;

    fn try_from(decl: SchemaDecl) -> SchemaResult<Self> {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in decl.fields {
            let name = field.name;
            let def = field.kind.into_def().map_err(|err| match err {
                SchemaError::InvalidDefault { source, .. } => SchemaError::InvalidDefault {
                    field: name.clone(),
                    source,
                },
                other => other,
            })?;
            fields.push((name, def));
        }
        Self::new(fields)
    }
}

impl TryFrom<&Schema> for SchemaDecl {
    type Error = SchemaError;

    fn try_from(schema: &Schema) -> SchemaResult<Self> {
        let fields = schema
            .fields()
            .map(|(name, def)| {
                let kind = FieldKindDecl::try_from_def(def).map_err(|source: FieldError| {
                    SchemaError::InvalidDefault {
                        field: name.to_string(),
                        source,
                    }
                })?;
                Ok(FieldDecl {
                    name: name.to_string(),
                    kind,
                })
            })
            .collect::<SchemaResult<_>>()?;
        Ok(Self { fields })
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SchemaDecl::try_from(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const SCHEMA_JSON: &str = r#"{
        "fields": [
            { "name": "user_id", "type": "string" },
            { "name": "page", "type": "int", "default": 2 },
            { "name": "ready", "type": "boolean" },
            { "name": "tags", "type": "list" },
            { "name": "mode", "type": "choice", "options": ["solo", "team"], "default": "team" },
            { "name": "sent", "type": "timestamp", "default": 1735707600 }
        ]
    }"#;

    #[test]
    fn schema_from_json_keeps_order() {
        let schema: Schema = serde_json::from_str(SCHEMA_JSON).unwrap();
        assert_eq!(schema.len(), 6);
        assert_eq!(schema.field_id("user_id"), Some("0"));
        assert_eq!(schema.field_id("sent"), Some("5"));
        assert_eq!(
            schema.field("page").unwrap().default,
            Some(FieldValue::Int(2))
        );
        assert_eq!(
            schema.field("mode").unwrap().default,
            Some(FieldValue::choice("team"))
        );
    }

    #[test]
    fn schema_json_roundtrip() {
        let schema: Schema = serde_json::from_str(SCHEMA_JSON).unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        let again: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, again);
    }

    #[test]
    fn invalid_choice_default_names_field() {
        let json = r#"{ "fields": [
            { "name": "mode", "type": "choice", "options": ["a"], "default": "b" }
        ] }"#;
        let err = serde_json::from_str::<Schema>(json).unwrap_err();
        assert!(err.to_string().contains("mode"));
    }

    #[test]
    fn unknown_type_rejected() {
        let json = r#"{ "fields": [ { "name": "x", "type": "float" } ] }"#;
        assert!(serde_json::from_str::<Schema>(json).is_err());
    }

    #[test]
    fn misspelled_key_rejected() {
        let json = r#"{ "fields": [
            { "name": "page", "type": "int", "defualt": 2 }
        ] }"#;
        let err = serde_json::from_str::<Schema>(json).unwrap_err();
        assert!(err.to_string().contains("defualt"));

        let json = r#"{ "fields": [], "version": 2 }"#;
        assert!(serde_json::from_str::<Schema>(json).is_err());

        let json = r#"{ "fields": [
            { "name": "flag", "type": "boolean", "options": ["a"] }
        ] }"#;
        assert!(serde_json::from_str::<Schema>(json).is_err());
    }

    #[test]
    fn fractional_timestamp_default_rejected() {
        let fractional = from_unix_seconds(1_735_707_600).unwrap() + Duration::from_millis(400);
        let err = Schema::builder()
            .field("sent", FieldDef::timestamp().with_default(fractional))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidDefault {
                field: "sent".to_string(),
                source: FieldError::FractionalTimestamp,
            }
        );
    }

    #[test]
    fn timestamp_default_survives_json() {
        let sent = from_unix_seconds(-90).unwrap();
        let schema = Schema::builder()
            .field("sent", FieldDef::timestamp().with_default(sent))
            .build()
            .unwrap();
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("-90"));
        let again: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(again, schema);
    }
}
