//! Error types for value conversion, deserialization, dispatch and path lookup.

use crate::node::Kind;
use thiserror::Error;

/// Why a [`ConversionError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionReason {
    /// The active variant cannot be read as the requested type at all.
    KindMismatch,
    /// An `Int` holding a negative value was read as an unsigned type.
    SignedNegative,
    /// A `UInt` above the signed range was read as a signed type.
    UnsignedExceedsMax,
    /// The value does not fit the narrower target width.
    Overflow,
    /// A fixed-size byte target did not match the stored length.
    LengthMismatch,
    /// `Bytes` requested as text were not valid UTF-8.
    InvalidUtf8,
    /// The variant/target pairing has no conversion rule.
    Unsupported,
}

/// A failed `get`/`opt` conversion or a kind-checked access on the wrong variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot read {actual} as {expected}: {}", .reason.describe())]
pub struct ConversionError {
    /// Name of the requested type or kind.
    pub expected: &'static str,
    /// Kind of the value that was inspected.
    pub actual: Kind,
    pub reason: ConversionReason,
}

impl ConversionError {
    pub fn new(expected: &'static str, actual: Kind, reason: ConversionReason) -> Self {
        Self {
            expected,
            actual,
            reason,
        }
    }

    pub(crate) fn mismatch(expected: &'static str, actual: Kind) -> Self {
        Self::new(expected, actual, ConversionReason::KindMismatch)
    }
}

impl ConversionReason {
    fn describe(&self) -> &'static str {
        match self {
            ConversionReason::KindMismatch => "kind mismatch",
            ConversionReason::SignedNegative => "signed value negative",
            ConversionReason::UnsignedExceedsMax => "unsigned value exceeds max",
            ConversionReason::Overflow => "value out of range for target width",
            ConversionReason::LengthMismatch => "byte length mismatch",
            ConversionReason::InvalidUtf8 => "bytes are not valid UTF-8",
            ConversionReason::Unsupported => "unsupported type",
        }
    }
}

/// Structural failures while rebuilding a typed value from a [`crate::Node`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeserializationError {
    #[error("missing field `{field}` for {target}")]
    MissingField {
        field: &'static str,
        target: &'static str,
    },

    #[error("{target} expects {expected} elements, found {actual}")]
    CountMismatch {
        target: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown variant `{name}` for {target}")]
    UnknownVariant { target: &'static str, name: String },

    #[error("ordinal {ordinal} does not name a variant of {target}")]
    UnknownOrdinal { target: &'static str, ordinal: i64 },

    #[error("cannot parse {target} from text: {message}")]
    InvalidText {
        target: &'static str,
        message: String,
    },
}

/// Handler-set validation and dispatch failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The handler at this registration index never wins for any kind.
    #[error("handler #{index} is unreachable: an earlier or closer handler covers every kind it accepts")]
    UnreachableHandler { index: usize },

    /// Exhaustive mode found a kind with no eligible handler.
    #[error("no handler covers kind {kind}")]
    Unhandled { kind: Kind },

    /// Best-effort mode dispatched a value whose kind has no handler.
    #[error("no handler matched a value of kind {kind}")]
    NoMatch { kind: Kind },

    #[error("a handler set accepts at most one fallback handler")]
    DuplicateFallback,
}

/// Errors that can occur anywhere in node-core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    #[error(transparent)]
    Match(#[from] MatchError),

    /// A shape the engine cannot map to or from a Node.
    #[error("unsupported type: {0}")]
    Unsupported(String),

    /// A dot path with an empty segment.
    #[error("invalid path `{0}`: empty segment")]
    InvalidPath(String),

    #[error("path `{0}` not found")]
    PathNotFound(String),

    /// Raised by custom serialize/deserialize methods and the serde bridge.
    #[error("{0}")]
    Custom(String),
}

impl NodeError {
    pub fn custom(message: impl std::fmt::Display) -> Self {
        NodeError::Custom(message.to_string())
    }
}

/// Convenience alias used throughout node-core.
pub type Result<T> = std::result::Result<T, NodeError>;
