use std::error::Error as StdError;

use joinery::JoinableIterator as _;
use lazy_format::lazy_format;

use crate::{record::Kind, util::dashed};

/// Everything that can go wrong while building a registry or binding
/// tokens into it. [`Error::HelpRequested`] isn't really a failure; check for
/// it with [`Error::is_help_request`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("field {field}: unsupported type {type_name}")]
    UnsupportedType { field: String, type_name: String },

    #[error("field {field}: unsupported sequence element type {element}")]
    UnsupportedElementType { field: String, element: String },

    #[error("duplicate flag name {name:?}")]
    DuplicateName { name: String },

    #[error("{} requires a value", dashed(.flag))]
    MissingValue { flag: String },

    #[error("{} doesn't take a value (got {value:?})", dashed(.flag))]
    UnexpectedValue { flag: String, value: String },

    #[error("unrecognized option {}", dashed(.flag))]
    UnrecognizedFlag { flag: String },

    #[error("{}: invalid {kind} value {value:?}", dashed(.flag))]
    InvalidValue {
        flag: String,
        value: String,
        kind: Kind,
    },

    #[error("{}: failed to convert {value:?}: {source}", dashed(.flag))]
    Conversion {
        flag: String,
        value: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("usage message was requested")]
    HelpRequested,
}

impl Error {
    #[inline]
    #[must_use]
    pub fn is_help_request(&self) -> bool {
        matches!(*self, Error::HelpRequested)
    }
}

/// A failure to coerce one piece of text, before it's known which flag the
/// text belonged to.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("invalid {0} value")]
    Invalid(Kind),

    #[error(transparent)]
    Conversion(Box<dyn StdError + Send + Sync>),
}

impl ValueError {
    pub(crate) fn with_flag(self, flag: &str, value: &str) -> Error {
        let flag = flag.to_owned();
        let value = value.to_owned();

        match self {
            ValueError::Invalid(kind) => Error::InvalidValue { flag, value, kind },
            ValueError::Conversion(source) => Error::Conversion {
                flag,
                value,
                source,
            },
        }
    }
}

/// The error produced by `#[derive(Convertible)]` on an enum when the text
/// doesn't name any of its variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} isn't one of {}", one_of(.expected))]
pub struct UnknownVariant {
    pub value: String,
    pub expected: &'static [&'static str],
}

impl UnknownVariant {
    #[must_use]
    pub fn new(value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            value: value.to_owned(),
            expected,
        }
    }
}

fn one_of(expected: &[&str]) -> impl core::fmt::Display {
    expected
        .iter()
        .map(|name| lazy_format!("{name:?}"))
        .join_with(", ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn messages_use_dashed_flags() {
        let err = Error::MissingValue { flag: "n".into() };
        assert_eq!(err.to_string(), "-n requires a value");

        let err = ValueError::Invalid(Kind::Int).with_flag("temperature", "warm");
        assert_eq!(err.to_string(), r#"--temperature: invalid int value "warm""#);
    }

    #[test]
    fn unknown_variant_lists_choices() {
        let err = UnknownVariant::new("loud", &["quiet", "normal"]);
        assert_eq!(err.to_string(), r#""loud" isn't one of "quiet", "normal""#);
    }
}
