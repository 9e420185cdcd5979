//! Field variants and their token encodings.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use token::{decode_base36, encode_base36};

use crate::choice::{ChoiceEnum, ChoiceOptions};
use crate::error::{FieldError, FieldResult, SchemaResult};

/// Unix time of the timestamp epoch; timestamps are encoded as seconds since it.
pub const TIMESTAMP_EPOCH_SECS: i64 = 1_735_707_600;

/// Token written for a `true` boolean. `false` is the empty token.
pub const TRUE_TOKEN: &str = "a";

/// The variant of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Text, one verbatim token.
    String,

    /// Signed integer, one base-36 token.
    Int,

    /// Boolean, one token of zero or one character.
    Boolean,

    /// Ordered text items, one token per item.
    List,

    /// One option of a fixed set, one identifier token.
    Choice(ChoiceOptions),

    /// Point in time with whole-second resolution, one base-36 token.
    Timestamp,
}

impl FieldKind {
    /// Returns the lowercase variant name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Choice(_) => "choice",
            Self::Timestamp => "timestamp",
        }
    }
}

/// A field value in decoded form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Boolean(bool),
    List(Vec<String>),
    /// The selected option name.
    Choice(String),
    Timestamp(SystemTime),
}

impl FieldValue {
    /// Creates a choice value selecting `option`.
    #[must_use]
    pub fn choice(option: impl Into<String>) -> Self {
        Self::Choice(option.into())
    }

    /// Returns the name of the variant this value belongs to.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Boolean(_) => "boolean",
            Self::List(_) => "list",
            Self::Choice(_) => "choice",
            Self::Timestamp(_) => "timestamp",
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for FieldValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|item| (*item).to_string()).collect())
    }
}

impl From<SystemTime> for FieldValue {
    fn from(value: SystemTime) -> Self {
        Self::Timestamp(value)
    }
}

/// A field definition: its variant and an optional default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub kind: FieldKind,
    pub default: Option<FieldValue>,
}

impl FieldDef {
    /// Creates a field of `kind` with no default.
    #[must_use]
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            default: None,
        }
    }

    /// Creates a text field.
    #[must_use]
    pub const fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// Creates an integer field.
    #[must_use]
    pub const fn int() -> Self {
        Self::new(FieldKind::Int)
    }

    /// Creates a boolean field.
    #[must_use]
    pub const fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// Creates a text list field.
    #[must_use]
    pub const fn list() -> Self {
        Self::new(FieldKind::List)
    }

    /// Creates a timestamp field.
    #[must_use]
    pub const fn timestamp() -> Self {
        Self::new(FieldKind::Timestamp)
    }

    /// Creates a choice field over `options`, in declaration order.
    pub fn choice<I, S>(options: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(FieldKind::Choice(ChoiceOptions::new(options)?)))
    }

    /// Creates a choice field over the variants of `E`.
    pub fn choice_enum<E: ChoiceEnum>() -> SchemaResult<Self> {
        Ok(Self::new(FieldKind::Choice(ChoiceOptions::of::<E>()?)))
    }

    /// Sets the default returned for unset fields.
    ///
    /// The default is checked against the variant when the schema is built.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Converts `value` into raw (unescaped) tokens.
    pub fn compress(&self, value: &FieldValue) -> FieldResult<Vec<String>> {
        match (&self.kind, value) {
            (FieldKind::String, FieldValue::String(text)) => Ok(vec![text.clone()]),
            (FieldKind::Int, FieldValue::Int(int)) => Ok(vec![encode_base36(*int)]),
            (FieldKind::Boolean, FieldValue::Boolean(flag)) => {
                let token = if *flag { TRUE_TOKEN } else { "" };
                Ok(vec![token.to_string()])
            }
            (FieldKind::List, FieldValue::List(items)) => Ok(items.clone()),
            (FieldKind::Choice(options), FieldValue::Choice(option)) => options
                .id_of(option)
                .map(|id| vec![id.to_string()])
                .ok_or_else(|| FieldError::UnknownOption {
                    option: option.clone(),
                }),
            (FieldKind::Timestamp, FieldValue::Timestamp(time)) => {
                let delta = unix_seconds(*time)?
                    .checked_sub(TIMESTAMP_EPOCH_SECS)
                    .ok_or(FieldError::TimestampOutOfRange)?;
                Ok(vec![encode_base36(delta)])
            }
            (kind, value) => Err(FieldError::TypeMismatch {
                expected: kind.name(),
                found: value.kind_name(),
            }),
        }
    }

    /// Converts raw (unescaped) tokens back into a value.
    pub fn decompress(&self, tokens: &[String]) -> FieldResult<FieldValue> {
        if matches!(self.kind, FieldKind::List) {
            return Ok(FieldValue::List(tokens.to_vec()));
        }

        let [token] = tokens else {
            return Err(FieldError::TokenCount {
                expected: 1,
                found: tokens.len(),
            });
        };

        match &self.kind {
            FieldKind::String => Ok(FieldValue::String(token.clone())),
            FieldKind::Int => Ok(FieldValue::Int(decode_base36(token)?)),
            FieldKind::Boolean => match token.as_str() {
                TRUE_TOKEN => Ok(FieldValue::Boolean(true)),
                "" => Ok(FieldValue::Boolean(false)),
                _ => Err(FieldError::InvalidBoolean {
                    token: token.clone(),
                }),
            },
            FieldKind::Choice(options) => options
                .option_of(token)
                .map(|option| FieldValue::Choice(option.to_string()))
                .ok_or_else(|| FieldError::UnknownOptionId { id: token.clone() }),
            FieldKind::Timestamp => {
                let seconds = decode_base36(token)?
                    .checked_add(TIMESTAMP_EPOCH_SECS)
                    .ok_or(FieldError::TimestampOutOfRange)?;
                Ok(FieldValue::Timestamp(from_unix_seconds(seconds)?))
            }
            FieldKind::List => Ok(FieldValue::List(tokens.to_vec())),
        }
    }

    /// Checks that `value` is acceptable for this field.
    pub fn validate(&self, value: &FieldValue) -> FieldResult<()> {
        self.compress(value).map(|_| ())
    }

    /// Checks that `value` can serve as this field's default.
    ///
    /// Timestamp defaults must be whole seconds so they survive a
    /// declaration round trip unchanged.
    pub fn validate_default(&self, value: &FieldValue) -> FieldResult<()> {
        self.validate(value)?;
        match value {
            FieldValue::Timestamp(time) if !is_whole_second(*time) => {
                Err(FieldError::FractionalTimestamp)
            }
            _ => Ok(()),
        }
    }
}

fn is_whole_second(time: SystemTime) -> bool {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.subsec_nanos() == 0,
        Err(before) => before.duration().subsec_nanos() == 0,
    }
}

/// Whole seconds since the Unix epoch, rounded towards negative infinity.
pub fn unix_seconds(time: SystemTime) -> FieldResult<i64> {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).map_err(|_| FieldError::TimestampOutOfRange),
        Err(before) => {
            let before = before.duration();
            let mut seconds =
                i64::try_from(before.as_secs()).map_err(|_| FieldError::TimestampOutOfRange)?;
            if before.subsec_nanos() > 0 {
                seconds = seconds
                    .checked_add(1)
                    .ok_or(FieldError::TimestampOutOfRange)?;
            }
            Ok(-seconds)
        }
    }
}

/// Inverse of [`unix_seconds`] for whole-second instants.
pub fn from_unix_seconds(seconds: i64) -> FieldResult<SystemTime> {
    let offset = Duration::from_secs(seconds.unsigned_abs());
    let time = if seconds >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    };
    time.ok_or(FieldError::TimestampOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_string()).collect()
    }

    fn epoch() -> SystemTime {
        from_unix_seconds(TIMESTAMP_EPOCH_SECS).unwrap()
    }

    #[test]
    fn string_is_verbatim() {
        let field = FieldDef::string();
        let value = FieldValue::from("a q j z b");
        assert_eq!(field.compress(&value).unwrap(), tokens(&["a q j z b"]));
        assert_eq!(field.decompress(&tokens(&["a q j z b"])).unwrap(), value);
    }

    #[test]
    fn int_is_base36() {
        let field = FieldDef::int();
        assert_eq!(field.compress(&FieldValue::Int(35)).unwrap(), tokens(&["z"]));
        assert_eq!(field.compress(&FieldValue::Int(-36)).unwrap(), tokens(&["-10"]));
        assert_eq!(
            field.decompress(&tokens(&["10"])).unwrap(),
            FieldValue::Int(36)
        );
    }

    #[test]
    fn int_rejects_garbage_token() {
        let field = FieldDef::int();
        let err = field.decompress(&tokens(&["1.5"])).unwrap_err();
        assert!(matches!(err, FieldError::Token(_)));
    }

    #[test]
    fn boolean_density() {
        let field = FieldDef::boolean();
        assert_eq!(field.compress(&FieldValue::Boolean(true)).unwrap(), tokens(&["a"]));
        assert_eq!(field.compress(&FieldValue::Boolean(false)).unwrap(), tokens(&[""]));
        assert_eq!(
            field.decompress(&tokens(&["a"])).unwrap(),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            field.decompress(&tokens(&[""])).unwrap(),
            FieldValue::Boolean(false)
        );
    }

    #[test]
    fn boolean_rejects_unknown_token() {
        let err = FieldDef::boolean()
            .decompress(&tokens(&["b"]))
            .unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidBoolean {
                token: "b".to_string()
            }
        );
    }

    #[test]
    fn list_is_one_token_per_item() {
        let field = FieldDef::list();
        let value = FieldValue::from(&["x", "", "y"][..]);
        assert_eq!(field.compress(&value).unwrap(), tokens(&["x", "", "y"]));
        assert_eq!(field.decompress(&tokens(&["x", "", "y"])).unwrap(), value);
        assert_eq!(
            field.decompress(&[]).unwrap(),
            FieldValue::List(Vec::new())
        );
    }

    #[test]
    fn choice_uses_option_ids() {
        let field = FieldDef::choice(["A", "B", "C"]).unwrap();
        assert_eq!(field.compress(&FieldValue::choice("B")).unwrap(), tokens(&["1"]));
        assert_eq!(
            field.decompress(&tokens(&["1"])).unwrap(),
            FieldValue::choice("B")
        );
    }

    #[test]
    fn choice_rejects_unlisted_option() {
        let field = FieldDef::choice(["A", "B", "C"]).unwrap();
        let err = field.compress(&FieldValue::choice("D")).unwrap_err();
        assert_eq!(
            err,
            FieldError::UnknownOption {
                option: "D".to_string()
            }
        );
    }

    #[test]
    fn choice_rejects_unknown_id() {
        let field = FieldDef::choice(["A"]).unwrap();
        let err = field.decompress(&tokens(&["5"])).unwrap_err();
        assert!(matches!(err, FieldError::UnknownOptionId { .. }));
    }

    #[test]
    fn timestamp_is_delta_from_epoch() {
        let field = FieldDef::timestamp();
        let at_epoch = FieldValue::Timestamp(epoch());
        let one_later = FieldValue::Timestamp(epoch() + Duration::from_secs(1));
        assert_eq!(field.compress(&at_epoch).unwrap(), tokens(&["0"]));
        assert_eq!(field.compress(&one_later).unwrap(), tokens(&["1"]));
        assert_eq!(field.decompress(&tokens(&["1"])).unwrap(), one_later);
    }

    #[test]
    fn timestamp_truncates_sub_second() {
        let field = FieldDef::timestamp();
        let value = FieldValue::Timestamp(epoch() + Duration::from_millis(1_999));
        assert_eq!(field.compress(&value).unwrap(), tokens(&["1"]));
    }

    #[test]
    fn timestamp_before_epoch_is_negative() {
        let field = FieldDef::timestamp();
        let value = FieldValue::Timestamp(epoch() - Duration::from_secs(36));
        assert_eq!(field.compress(&value).unwrap(), tokens(&["-10"]));
        assert_eq!(field.decompress(&tokens(&["-10"])).unwrap(), value);
    }

    #[test]
    fn unix_seconds_floors_before_1970() {
        let time = UNIX_EPOCH - Duration::from_millis(500);
        assert_eq!(unix_seconds(time).unwrap(), -1);
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let err = FieldDef::int().compress(&FieldValue::from("7")).unwrap_err();
        assert_eq!(
            err,
            FieldError::TypeMismatch {
                expected: "int",
                found: "string"
            }
        );
    }

    #[test]
    fn single_token_variants_check_token_count() {
        for field in [
            FieldDef::string(),
            FieldDef::int(),
            FieldDef::boolean(),
            FieldDef::timestamp(),
        ] {
            let err = field.decompress(&tokens(&["1", "2"])).unwrap_err();
            assert_eq!(
                err,
                FieldError::TokenCount {
                    expected: 1,
                    found: 2
                }
            );
            assert!(field.decompress(&[]).is_err());
        }
    }

    #[test]
    fn with_default_sets_default() {
        let field = FieldDef::int().with_default(3);
        assert_eq!(field.default, Some(FieldValue::Int(3)));
    }

    #[test]
    fn timestamp_default_must_be_whole_seconds() {
        let def = FieldDef::timestamp();
        let whole = FieldValue::Timestamp(epoch());
        let fractional = FieldValue::Timestamp(epoch() + Duration::from_millis(250));
        let before_epoch = FieldValue::Timestamp(UNIX_EPOCH - Duration::from_millis(500));

        assert!(def.validate_default(&whole).is_ok());
        assert!(def.validate(&fractional).is_ok());
        assert_eq!(
            def.validate_default(&fractional),
            Err(FieldError::FractionalTimestamp)
        );
        assert_eq!(
            def.validate_default(&before_epoch),
            Err(FieldError::FractionalTimestamp)
        );
    }
}
