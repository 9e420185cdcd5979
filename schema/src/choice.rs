//! Choice options and typed choice enums.

use crate::error::{SchemaError, SchemaResult};
use crate::field::FieldValue;
use crate::keys::KeyTable;

/// The fixed, ordered option set of a choice field.
///
/// Each option gets a base-36 identifier in declaration order; only the
/// identifier travels in encoded state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOptions {
    keys: KeyTable,
}

impl ChoiceOptions {
    /// Creates an option set from names in declaration order.
    pub fn new<I, S>(options: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys =
            KeyTable::from_names(options).map_err(|option| SchemaError::DuplicateOption { option })?;
        if keys.is_empty() {
            return Err(SchemaError::EmptyChoice);
        }
        Ok(Self { keys })
    }

    /// Creates an option set from the variants of a [`ChoiceEnum`].
    pub fn of<E: ChoiceEnum>() -> SchemaResult<Self> {
        Self::new(E::VARIANTS.iter().map(|variant| variant.name()))
    }

    /// Returns the identifier of `option`.
    #[must_use]
    pub fn id_of(&self, option: &str) -> Option<&str> {
        self.keys.id_of(option)
    }

    /// Returns the option owning identifier `id`.
    #[must_use]
    pub fn option_of(&self, id: &str) -> Option<&str> {
        self.keys.name_of(id)
    }

    /// Returns `true` if `option` is listed.
    #[must_use]
    pub fn contains(&self, option: &str) -> bool {
        self.keys.contains(option)
    }

    /// Returns the number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; construction rejects empty option sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over option names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.names()
    }
}

/// A closed set of compile-time-known options, usually continuation handlers.
///
/// `VARIANTS` fixes the declaration order and therefore the identifiers.
/// Decoded state carries only an option name; [`ChoiceEnum::from_name`]
/// turns it back into a variant for the caller to `match` on.
///
/// ```
/// use schema::{ChoiceEnum, FieldDef};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Next {
///     Accept,
///     Decline,
/// }
///
/// impl ChoiceEnum for Next {
///     const VARIANTS: &'static [Self] = &[Self::Accept, Self::Decline];
///
///     fn name(self) -> &'static str {
///         match self {
///             Self::Accept => "accept",
///             Self::Decline => "decline",
///         }
///     }
/// }
///
/// let field = FieldDef::choice_enum::<Next>().unwrap();
/// assert_eq!(field.compress(&Next::Decline.value()).unwrap(), vec!["1".to_string()]);
/// assert_eq!(Next::from_name("accept"), Some(Next::Accept));
/// ```
pub trait ChoiceEnum: Copy + 'static {
    /// All variants in declaration order.
    const VARIANTS: &'static [Self];

    /// Stable option name of this variant.
    fn name(self) -> &'static str;

    /// Looks up the variant with option name `name`.
    #[must_use]
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.name() == name)
    }

    /// The field value selecting this variant.
    #[must_use]
    fn value(self) -> FieldValue {
        FieldValue::Choice(self.name().to_string())
    }
}
