//! The state container: field accessors and encode/decode.

use std::time::SystemTime;

use indexmap::IndexMap;
use schema::{schema_fingerprint, ChoiceEnum, FieldDef, FieldKind, FieldValue, Schema};
use token::{BlockReader, BlockWriter};

use crate::error::{CodecError, CodecResult, LimitKind};
use crate::limits::CodecLimits;

/// Field values for one schema, packed to and from a short string.
///
/// Only fields that were saved or decoded are stored. They are kept in
/// insertion order, which is also the order of blocks in [`encode`](Self::encode)
/// output. Reads of unset fields fall back to the field's default.
///
/// ```
/// use codec::{FieldDef, Schema, StateData};
///
/// let schema = Schema::builder()
///     .field("user", FieldDef::string())
///     .field("page", FieldDef::int().with_default(0))
///     .build()
///     .unwrap();
///
/// let mut state = StateData::new(&schema);
/// state.save("user", "1234")?.save("page", 3)?;
/// let encoded = state.encode()?;
/// assert_eq!(encoded, "0q1234j1q3j");
///
/// let decoded = StateData::decode(&schema, &encoded)?;
/// assert_eq!(decoded.get_int("page")?, Some(3));
/// # Ok::<(), codec::CodecError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateData<'s> {
    schema: &'s Schema,
    values: IndexMap<String, FieldValue>,
}

impl<'s> StateData<'s> {
    /// Creates an empty container; every field is unset.
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            values: IndexMap::new(),
        }
    }

    /// Decodes `encoded` with the default [`CodecLimits`].
    pub fn decode(schema: &'s Schema, encoded: &str) -> CodecResult<Self> {
        Self::decode_with_limits(schema, encoded, &CodecLimits::default())
    }

    /// Decodes `encoded`, rejecting the whole string on the first bad block.
    pub fn decode_with_limits(
        schema: &'s Schema,
        encoded: &str,
        limits: &CodecLimits,
    ) -> CodecResult<Self> {
        match decode_values(schema, encoded, limits) {
            Ok(values) => {
                tracing::trace!(
                    fields = values.len(),
                    input_len = encoded.len(),
                    "decoded state"
                );
                Ok(Self { schema, values })
            }
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    input_len = encoded.len(),
                    schema = format_args!("{:016x}", schema_fingerprint(schema)),
                    "rejected encoded state"
                );
                Err(err)
            }
        }
    }

    /// Returns the schema this container was built for.
    #[must_use]
    pub const fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Packs every stored field into a single string.
    pub fn encode(&self) -> CodecResult<String> {
        let mut writer = BlockWriter::with_capacity(self.values.len() * 8);
        for (name, value) in &self.values {
            let (id, def) = self.lookup(name)?;
            let tokens = def
                .compress(value)
                .map_err(|source| CodecError::InvalidValue {
                    field: name.clone(),
                    source,
                })?;
            writer.write_block(id, &tokens);
        }
        tracing::trace!(
            fields = writer.blocks_written(),
            len = writer.len(),
            "encoded state"
        );
        Ok(writer.finish())
    }

    /// Returns the stored value of `name`, or its default.
    pub fn get(&self, name: &str) -> CodecResult<Option<&FieldValue>> {
        let def = self.field_def(name)?;
        Ok(self.values.get(name).or(def.default.as_ref()))
    }

    /// Returns `true` if `name` was saved or decoded (defaults do not count).
    pub fn is_set(&self, name: &str) -> CodecResult<bool> {
        self.field_def(name)?;
        Ok(self.values.contains_key(name))
    }

    /// Tests the current value of `name` against `value`.
    ///
    /// Values compare by their encoded form, so two timestamps within the same
    /// second are equal. For boolean fields `value` is ignored and the result
    /// is whether the current value is `true`. An unset field without a
    /// default equals nothing.
    pub fn is(&self, name: &str, value: impl Into<FieldValue>) -> CodecResult<bool> {
        let def = self.field_def(name)?;
        if matches!(def.kind, FieldKind::Boolean) {
            return self.flag(name);
        }

        let value = value.into();
        let invalid = |source| CodecError::InvalidValue {
            field: name.to_string(),
            source,
        };
        let expected = def.compress(&value).map_err(invalid)?;
        match self.get(name)? {
            Some(current) => Ok(def.compress(current).map_err(invalid)? == expected),
            None => Ok(false),
        }
    }

    /// Reads a boolean field; unset without default reads as `false`.
    pub fn flag(&self, name: &str) -> CodecResult<bool> {
        Ok(self.get_bool(name)?.unwrap_or(false))
    }

    /// Validates `value` and stores it in place.
    ///
    /// Nothing changes if validation fails.
    pub fn save(&mut self, name: &str, value: impl Into<FieldValue>) -> CodecResult<&mut Self> {
        let value = value.into();
        self.validate(name, &value)?;
        self.values.insert(name.to_string(), value);
        Ok(self)
    }

    /// Returns a copy with `name` set to `value`, leaving `self` untouched.
    pub fn derive(&self, name: &str, value: impl Into<FieldValue>) -> CodecResult<Self> {
        let value = value.into();
        self.validate(name, &value)?;
        let mut next = self.clone();
        next.values.insert(name.to_string(), value);
        Ok(next)
    }

    /// Reads a string field.
    pub fn get_str(&self, name: &str) -> CodecResult<Option<&str>> {
        match self.typed(name, "string")? {
            Some(FieldValue::String(text)) => Ok(Some(text)),
            _ => Ok(None),
        }
    }

    /// Reads an int field.
    pub fn get_int(&self, name: &str) -> CodecResult<Option<i64>> {
        match self.typed(name, "int")? {
            Some(FieldValue::Int(int)) => Ok(Some(*int)),
            _ => Ok(None),
        }
    }

    /// Reads a boolean field.
    pub fn get_bool(&self, name: &str) -> CodecResult<Option<bool>> {
        match self.typed(name, "boolean")? {
            Some(FieldValue::Boolean(flag)) => Ok(Some(*flag)),
            _ => Ok(None),
        }
    }

    /// Reads a list field.
    pub fn get_list(&self, name: &str) -> CodecResult<Option<&[String]>> {
        match self.typed(name, "list")? {
            Some(FieldValue::List(items)) => Ok(Some(items)),
            _ => Ok(None),
        }
    }

    /// Reads the selected option name of a choice field.
    pub fn get_choice(&self, name: &str) -> CodecResult<Option<&str>> {
        match self.typed(name, "choice")? {
            Some(FieldValue::Choice(option)) => Ok(Some(option)),
            _ => Ok(None),
        }
    }

    /// Reads a choice field as a typed enum variant, ready to dispatch on.
    pub fn get_choice_as<E: ChoiceEnum>(&self, name: &str) -> CodecResult<Option<E>> {
        Ok(self.get_choice(name)?.and_then(E::from_name))
    }

    /// Reads a timestamp field.
    pub fn get_timestamp(&self, name: &str) -> CodecResult<Option<SystemTime>> {
        match self.typed(name, "timestamp")? {
            Some(FieldValue::Timestamp(time)) => Ok(Some(*time)),
            _ => Ok(None),
        }
    }

    /// Iterates over stored `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> + '_ {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of stored fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no field is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn field_def(&self, name: &str) -> CodecResult<&'s FieldDef> {
        self.schema
            .field(name)
            .ok_or_else(|| CodecError::UnknownField {
                name: name.to_string(),
            })
    }

    fn lookup(&self, name: &str) -> CodecResult<(&'s str, &'s FieldDef)> {
        let def = self.field_def(name)?;
        let id = self
            .schema
            .field_id(name)
            .ok_or_else(|| CodecError::UnknownField {
                name: name.to_string(),
            })?;
        Ok((id, def))
    }

    fn validate(&self, name: &str, value: &FieldValue) -> CodecResult<()> {
        self.field_def(name)?
            .validate(value)
            .map_err(|source| CodecError::InvalidValue {
                field: name.to_string(),
                source,
            })
    }

    fn typed(&self, name: &str, expected: &'static str) -> CodecResult<Option<&FieldValue>> {
        let def = self.field_def(name)?;
        if def.kind.name() != expected {
            return Err(CodecError::TypeMismatch {
                field: name.to_string(),
                expected,
                found: def.kind.name(),
            });
        }
        self.get(name)
    }
}

fn decode_values(
    schema: &Schema,
    encoded: &str,
    limits: &CodecLimits,
) -> CodecResult<IndexMap<String, FieldValue>> {
    if encoded.len() > limits.max_input_len {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::InputLength,
            limit: limits.max_input_len,
            actual: encoded.len(),
        });
    }

    let mut values = IndexMap::new();
    for (count, block) in BlockReader::new(encoded).enumerate() {
        if count >= limits.max_blocks {
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::Blocks,
                limit: limits.max_blocks,
                actual: count + 1,
            });
        }
        let block = block?;
        let (name, def) = schema
            .field_by_id(&block.id)
            .ok_or_else(|| CodecError::UnknownFieldId {
                id: block.id.clone(),
                offset: block.offset,
            })?;
        let value = def
            .decompress(&block.tokens)
            .map_err(|source| CodecError::InvalidField {
                field: name.to_string(),
                source,
            })?;
        values.insert(name.to_string(), value);
    }
    Ok(values)
}
