//! Introspection and debugging tools for the cidpack codec.
//!
//! This crate provides utilities for inspecting and understanding encoded state:
//!
//! - Split an encoded string into its field blocks, with or without a schema
//! - Decode state into structured JSON
//! - Encode JSON values into state and custom ids
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::fmt::Write as _;

use anyhow::{anyhow, bail, Context, Result};
use codec::{compose_custom_id, CodecLimits, CustomId, StateData};
use schema::{
    from_unix_seconds, schema_fingerprint, unix_seconds, FieldDef, FieldKind, FieldValue, Schema,
};
use serde::Serialize;
use serde_json::{Map, Value};
use token::BlockReader;

/// Structure of one encoded string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    /// Routing prefix, when the input was read as a custom id.
    pub prefix: Option<String>,
    /// Fingerprint of the schema used to name fields, if any.
    pub schema_fingerprint: Option<String>,
    /// Length of the encoded state in characters.
    pub state_chars: usize,
    pub blocks: Vec<BlockReport>,
}

/// One field block of an inspected string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockReport {
    pub id: String,
    /// Field name, when a schema was given and knows the id.
    pub field: Option<String>,
    pub offset: usize,
    pub byte_len: usize,
    pub tokens: Vec<String>,
    /// Decoded value, or why the tokens do not decode for the named field.
    pub value: Option<Result<Value, String>>,
}

/// Decoded state as ordered JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeOutput {
    pub schema_fingerprint: String,
    pub prefix: Option<String>,
    /// Stored fields in encoded order.
    pub fields: Map<String, Value>,
    /// Values of unset fields that have a default.
    pub defaults: Map<String, Value>,
}

/// Parses a JSON schema declaration.
///
/// Declarations are validated while they are read, so an invalid default or
/// a duplicate name fails here.
pub fn parse_schema_json(json: &str) -> Result<Schema> {
    serde_json::from_str(json).context("parse schema json")
}

/// Splits `input` into field blocks without decoding any value.
///
/// With `custom_id` set the input is first split into prefix and state.
pub fn inspect_state(
    input: &str,
    custom_id: bool,
    schema: Option<&Schema>,
    limits: &CodecLimits,
) -> Result<InspectReport> {
    let (prefix, state) = split_input(input, custom_id, limits)?;
    if state.len() > limits.max_input_len {
        bail!(
            "state is {} bytes, limit is {}",
            state.len(),
            limits.max_input_len
        );
    }

    let mut blocks = Vec::new();
    for block in BlockReader::new(state) {
        let block = block.context("tokenize state")?;
        let named = schema.and_then(|schema| schema.field_by_id(&block.id));
        let value = named.map(|(_, def)| {
            def.decompress(&block.tokens)
                .map_err(|err| err.to_string())
                .and_then(|value| value_to_json(&value).map_err(|err| err.to_string()))
        });
        blocks.push(BlockReport {
            id: block.id,
            field: named.map(|(name, _)| name.to_string()),
            offset: block.offset,
            byte_len: 0,
            tokens: block.tokens,
            value,
        });
    }
    // Each block ends where the next one starts.
    let mut next_offset = state.len();
    for block in blocks.iter_mut().rev() {
        block.byte_len = next_offset - block.offset;
        next_offset = block.offset;
    }

    Ok(InspectReport {
        prefix: prefix.map(str::to_string),
        schema_fingerprint: schema.map(|schema| format!("{:016x}", schema_fingerprint(schema))),
        state_chars: state.chars().count(),
        blocks,
    })
}

/// Decodes `input` against `schema` into JSON.
pub fn decode_state_json(
    input: &str,
    custom_id: bool,
    schema: &Schema,
    limits: &CodecLimits,
) -> Result<DecodeOutput> {
    let (prefix, encoded) = split_input(input, custom_id, limits)?;
    let state = StateData::decode_with_limits(schema, encoded, limits).context("decode state")?;

    let mut fields = Map::new();
    for (name, value) in state.iter() {
        fields.insert(name.to_string(), value_to_json(value)?);
    }
    let mut defaults = Map::new();
    for (name, def) in schema.fields() {
        if fields.contains_key(name) {
            continue;
        }
        if let Some(default) = &def.default {
            defaults.insert(name.to_string(), value_to_json(default)?);
        }
    }

    Ok(DecodeOutput {
        schema_fingerprint: format!("{:016x}", schema_fingerprint(schema)),
        prefix: prefix.map(str::to_string),
        fields,
        defaults,
    })
}

/// Encodes `values` (field name to JSON value, in order) against `schema`.
///
/// With a prefix the result is a full custom id.
pub fn encode_state_json(
    schema: &Schema,
    values: &Map<String, Value>,
    prefix: Option<&str>,
    limits: &CodecLimits,
) -> Result<String> {
    let mut state = StateData::new(schema);
    for (name, json) in values {
        let def = schema
            .field(name)
            .ok_or_else(|| anyhow!("unknown field {name:?}"))?;
        let value = value_from_json(def, json).with_context(|| format!("field {name:?}"))?;
        state.save(name, value)?;
    }
    match prefix {
        Some(prefix) => Ok(compose_custom_id(prefix, &state, limits)?),
        None => Ok(state.encode()?),
    }
}

/// JSON form of a value. Timestamps are Unix seconds.
pub fn value_to_json(value: &FieldValue) -> Result<Value> {
    Ok(match value {
        FieldValue::String(text) | FieldValue::Choice(text) => Value::String(text.clone()),
        FieldValue::Int(int) => Value::from(*int),
        FieldValue::Boolean(flag) => Value::Bool(*flag),
        FieldValue::List(items) => Value::from(items.clone()),
        FieldValue::Timestamp(time) => Value::from(unix_seconds(*time)?),
    })
}

/// Reads a JSON value as the variant of `def`.
pub fn value_from_json(def: &FieldDef, json: &Value) -> Result<FieldValue> {
    let value = match (&def.kind, json) {
        (FieldKind::String, Value::String(text)) => FieldValue::String(text.clone()),
        (FieldKind::Choice(_), Value::String(text)) => FieldValue::Choice(text.clone()),
        (FieldKind::Int, Value::Number(number)) => FieldValue::Int(
            number
                .as_i64()
                .ok_or_else(|| anyhow!("{number} is not a 64-bit integer"))?,
        ),
        (FieldKind::Boolean, Value::Bool(flag)) => FieldValue::Boolean(*flag),
        (FieldKind::List, Value::Array(items)) => FieldValue::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(text) => Ok(text.clone()),
                    other => Err(anyhow!("list item {other} is not a string")),
                })
                .collect::<Result<_>>()?,
        ),
        (FieldKind::Timestamp, Value::Number(number)) => {
            let seconds = number
                .as_i64()
                .ok_or_else(|| anyhow!("{number} is not whole Unix seconds"))?;
            FieldValue::Timestamp(from_unix_seconds(seconds)?)
        }
        (kind, other) => bail!("expected {} value, found {other}", kind.name()),
    };
    Ok(value)
}

/// Renders decoded state one field per line.
pub fn format_decode_pretty(output: &DecodeOutput) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "schema: {}", output.schema_fingerprint);
    if let Some(prefix) = &output.prefix {
        let _ = writeln!(out, "prefix: {prefix}");
    }
    let _ = writeln!(out, "fields:");
    for (name, value) in &output.fields {
        let _ = writeln!(out, "  {name} = {value}");
    }
    if !output.defaults.is_empty() {
        let _ = writeln!(out, "defaults:");
        for (name, value) in &output.defaults {
            let _ = writeln!(out, "  {name} = {value}");
        }
    }
    out
}

fn split_input<'a>(
    input: &'a str,
    custom_id: bool,
    limits: &CodecLimits,
) -> Result<(Option<&'a str>, &'a str)> {
    if !custom_id {
        return Ok((None, input));
    }
    let id = CustomId::parse(input, limits).context("parse custom id")?;
    Ok((Some(id.prefix), id.payload))
}
