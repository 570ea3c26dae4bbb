//! Coercion table behind [`Node::get`] and [`Node::opt`].
//!
//! | Target | Accepted variants |
//! |---|---|
//! | `bool` | `Bool`; `Int`/`UInt` as `value != 0` |
//! | signed ints | `Int`; `UInt` when `<= i64::MAX` |
//! | unsigned ints | `UInt`; `Int` when `>= 0` |
//! | `f32`/`f64` | `Int`, `UInt`, `Float` (never fails) |
//! | `String` | `Text`; `Bytes` holding UTF-8 |
//! | `Vec<u8>`, `[u8; N]` | `Bytes` (length must equal `N`) |
//! | `Vec<Node>`, `Mapping` | matching container only |
//! | `Node` | anything |
//!
//! Integer targets run two independent checks: first the cross-family check
//! (`Int` into unsigned, `UInt` into signed), then the narrowing check into the
//! target width.

use crate::error::{ConversionError, ConversionReason};
use crate::node::{Mapping, Node};

/// A type that can be read out of a [`Node`] by [`Node::get`].
pub trait Coerce: Sized {
    /// Name reported as the expected type in conversion errors.
    const TARGET: &'static str;

    fn coerce(node: &Node) -> Result<Self, ConversionError>;
}

fn unsupported(target: &'static str, node: &Node) -> ConversionError {
    ConversionError::new(target, node.kind(), ConversionReason::Unsupported)
}

impl Coerce for bool {
    const TARGET: &'static str = "bool";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        match node {
            Node::Bool(b) => Ok(*b),
            Node::Int(i) => Ok(*i != 0),
            Node::UInt(u) => Ok(*u != 0),
            other => Err(unsupported(Self::TARGET, other)),
        }
    }
}

macro_rules! coerce_signed {
    ($($t:ty),*) => {$(
        impl Coerce for $t {
            const TARGET: &'static str = stringify!($t);

            fn coerce(node: &Node) -> Result<Self, ConversionError> {
                let wide: i64 = match node {
                    Node::Int(i) => *i,
                    Node::UInt(u) => i64::try_from(*u).map_err(|_| {
                        ConversionError::new(
                            Self::TARGET,
                            node.kind(),
                            ConversionReason::UnsignedExceedsMax,
                        )
                    })?,
                    other => return Err(unsupported(Self::TARGET, other)),
                };
                <$t>::try_from(wide).map_err(|_| {
                    ConversionError::new(Self::TARGET, node.kind(), ConversionReason::Overflow)
                })
            }
        }
    )*};
}

macro_rules! coerce_unsigned {
    ($($t:ty),*) => {$(
        impl Coerce for $t {
            const TARGET: &'static str = stringify!($t);

            fn coerce(node: &Node) -> Result<Self, ConversionError> {
                let wide: u64 = match node {
                    Node::UInt(u) => *u,
                    Node::Int(i) if *i < 0 => {
                        return Err(ConversionError::new(
                            Self::TARGET,
                            node.kind(),
                            ConversionReason::SignedNegative,
                        ))
                    }
                    Node::Int(i) => *i as u64,
                    other => return Err(unsupported(Self::TARGET, other)),
                };
                <$t>::try_from(wide).map_err(|_| {
                    ConversionError::new(Self::TARGET, node.kind(), ConversionReason::Overflow)
                })
            }
        }
    )*};
}

coerce_signed!(i8, i16, i32, i64, isize);
coerce_unsigned!(u8, u16, u32, u64, usize);

impl Coerce for f64 {
    const TARGET: &'static str = "f64";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        match node {
            Node::Float(f) => Ok(*f),
            Node::Int(i) => Ok(*i as f64),
            Node::UInt(u) => Ok(*u as f64),
            other => Err(unsupported(Self::TARGET, other)),
        }
    }
}

impl Coerce for f32 {
    const TARGET: &'static str = "f32";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        f64::coerce(node)
            .map(|f| f as f32)
            .map_err(|_| unsupported(Self::TARGET, node))
    }
}

impl Coerce for String {
    const TARGET: &'static str = "text";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        match node {
            Node::Text(s) => Ok(s.clone()),
            Node::Bytes(b) => String::from_utf8(b.clone()).map_err(|_| {
                ConversionError::new(Self::TARGET, node.kind(), ConversionReason::InvalidUtf8)
            }),
            other => Err(ConversionError::mismatch(Self::TARGET, other.kind())),
        }
    }
}

impl Coerce for Vec<u8> {
    const TARGET: &'static str = "bytes";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        node.as_bytes().map(<[u8]>::to_vec)
    }
}

impl<const N: usize> Coerce for [u8; N] {
    const TARGET: &'static str = "fixed bytes";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        let bytes = node.as_bytes()?;
        <[u8; N]>::try_from(bytes).map_err(|_| {
            ConversionError::new(Self::TARGET, node.kind(), ConversionReason::LengthMismatch)
        })
    }
}

impl Coerce for Vec<Node> {
    const TARGET: &'static str = "sequence";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        node.as_sequence().cloned()
    }
}

impl Coerce for Mapping {
    const TARGET: &'static str = "mapping";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        node.as_mapping().cloned()
    }
}

impl Coerce for Node {
    const TARGET: &'static str = "node";

    fn coerce(node: &Node) -> Result<Self, ConversionError> {
        Ok(node.clone())
    }
}
