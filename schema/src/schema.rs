//! Schema definitions and validation.

use indexmap::IndexMap;

use crate::error::{SchemaError, SchemaResult};
use crate::field::FieldDef;
use crate::keys::KeyTable;

/// An ordered set of named fields.
///
/// Field names get compact identifiers in declaration order. Changing the
/// set or order of names invalidates strings encoded under the old schema.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "crate::SchemaDecl")
)]
pub struct Schema {
    fields: IndexMap<String, FieldDef>,
    keys: KeyTable,
}

impl Schema {
    /// Creates a schema from named fields after validation.
    pub fn new<S: Into<String>>(fields: Vec<(S, FieldDef)>) -> SchemaResult<Self> {
        let mut map = IndexMap::with_capacity(fields.len());
        let mut keys = KeyTable::new();
        for (name, def) in fields {
            let name = name.into();
            keys.push(name.clone())
                .map_err(|name| SchemaError::DuplicateField { name })?;
            map.insert(name, def);
        }
        let schema = Self { fields: map, keys };
        schema.validate()?;
        Ok(schema)
    }

    /// Creates a schema builder.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Validates field defaults against their variants.
    pub fn validate(&self) -> SchemaResult<()> {
        for (name, def) in &self.fields {
            if let Some(default) = &def.default {
                def.validate_default(default)
                    .map_err(|source| SchemaError::InvalidDefault {
                        field: name.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Returns the definition of field `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Returns the compact identifier of field `name`.
    #[must_use]
    pub fn field_id(&self, name: &str) -> Option<&str> {
        self.keys.id_of(name)
    }

    /// Returns the field name owning compact identifier `id`.
    #[must_use]
    pub fn field_name(&self, id: &str) -> Option<&str> {
        self.keys.name_of(id)
    }

    /// Resolves compact identifier `id` to its field name and definition.
    #[must_use]
    pub fn field_by_id(&self, id: &str) -> Option<(&str, &FieldDef)> {
        let name = self.keys.name_of(id)?;
        self.fields
            .get_key_value(name)
            .map(|(name, def)| (name.as_str(), def))
    }

    /// Returns the name-to-identifier table.
    #[must_use]
    pub const fn keys(&self) -> &KeyTable {
        &self.keys
    }

    /// Iterates over `(name, definition)` in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> + '_ {
        self.fields.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for `Schema`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldDef)>,
}

impl SchemaBuilder {
    /// Adds a field definition.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.push((name.into(), def));
        self
    }

    /// Builds the schema after validation.
    pub fn build(self) -> SchemaResult<Schema> {
        Schema::new(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldError, FieldKind, FieldValue};

    fn challenge_schema() -> Schema {
        Schema::builder()
            .field("time_sent", FieldDef::timestamp())
            .field("initiator_id", FieldDef::string())
            .field("opponent_id", FieldDef::string())
            .field("best_of", FieldDef::int().with_default(1))
            .field("accepted", FieldDef::boolean())
            .field("callback", FieldDef::choice(["accept"]).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn schema_builder_roundtrip() {
        let schema = challenge_schema();
        assert_eq!(schema.len(), 6);
        assert!(matches!(
            schema.field("callback").unwrap().kind,
            FieldKind::Choice(_)
        ));
        let names: Vec<_> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "time_sent",
                "initiator_id",
                "opponent_id",
                "best_of",
                "accepted",
                "callback"
            ]
        );
    }

    #[test]
    fn field_ids_follow_declaration_order() {
        let schema = challenge_schema();
        assert_eq!(schema.field_id("time_sent"), Some("0"));
        assert_eq!(schema.field_id("callback"), Some("5"));
        assert_eq!(schema.field_name("3"), Some("best_of"));
        assert_eq!(schema.field_name("6"), None);
        assert_eq!(schema.field_id("missing"), None);
    }

    #[test]
    fn same_declaration_same_ids() {
        let a = challenge_schema();
        let b = challenge_schema();
        for (name, _) in a.fields() {
            assert_eq!(a.field_id(name), b.field_id(name));
        }
        assert_eq!(a, b);
    }

    #[test]
    fn schema_rejects_duplicate_field_names() {
        let err = Schema::builder()
            .field("a", FieldDef::string())
            .field("a", FieldDef::int())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn schema_rejects_default_of_wrong_type() {
        let err = Schema::new(vec![("n", FieldDef::int().with_default("one"))]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidDefault {
                source: FieldError::TypeMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn schema_rejects_unlisted_choice_default() {
        let def = FieldDef::choice(["a", "b"])
            .unwrap()
            .with_default(FieldValue::choice("c"));
        let err = Schema::new(vec![("mode", def)]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
    }

    #[test]
    fn empty_schema_is_valid() {
        let schema = Schema::new(Vec::<(String, FieldDef)>::new()).unwrap();
        assert!(schema.is_empty());
        assert!(schema.keys().is_empty());
    }

    #[test]
    fn field_by_id_resolves_name_and_definition() {
        let schema = challenge_schema();
        let (name, def) = schema.field_by_id("3").unwrap();
        assert_eq!(name, "best_of");
        assert_eq!(def.default, Some(FieldValue::Int(1)));
        assert!(schema.field_by_id("6").is_none());
        assert!(schema.field_by_id("03").is_none());
    }
}
