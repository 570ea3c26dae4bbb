//! Unit-only enums: ordinal or symbolic-name representation.
//!
//! `#[derive(NodeEnum)]` implements [`NodeEnum`], [`ByName`], `MapKey`,
//! `ToNode` and `FromNode`. By default a variant serializes as its
//! discriminant (`Int`); `#[node(by_name)]` on the enum switches it to the
//! variant name (`Text`). A record field can request the name form for a single
//! field with `#[node(by_name)]`, which goes through [`ByName`].

use crate::error::{DeserializationError, Result};
use crate::node::Node;

/// A fieldless enum with a known, ordered set of variants.
pub trait NodeEnum: Sized + Copy + 'static {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Variants in declaration order.
    const VARIANTS: &'static [Self];

    /// Whether the enum serializes by name unless a field says otherwise.
    const BY_NAME: bool;

    fn ordinal(&self) -> i64;

    fn name(&self) -> &'static str;

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.ordinal() == ordinal)
    }

    /// Exact, case-sensitive match on the variant name.
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.name() == name)
    }
}

/// Serialize `value` using the enum's default representation.
pub fn enum_to_node<E: NodeEnum>(value: &E) -> Node {
    if E::BY_NAME {
        Node::Text(value.name().to_string())
    } else {
        Node::Int(value.ordinal())
    }
}

/// Deserialize using the enum's default representation.
pub fn enum_from_node<E: NodeEnum>(node: &Node) -> Result<E> {
    if E::BY_NAME {
        enum_from_name(node)
    } else {
        enum_from_ordinal(node)
    }
}

/// Ordinals must name a declared variant.
pub fn enum_from_ordinal<E: NodeEnum>(node: &Node) -> Result<E> {
    let ordinal: i64 = node.get()?;
    E::from_ordinal(ordinal).ok_or_else(|| {
        DeserializationError::UnknownOrdinal {
            target: E::NAME,
            ordinal,
        }
        .into()
    })
}

pub fn enum_from_name<E: NodeEnum>(node: &Node) -> Result<E> {
    let name = node.as_str()?;
    E::from_name(name).ok_or_else(|| {
        DeserializationError::UnknownVariant {
            target: E::NAME,
            name: name.to_string(),
        }
        .into()
    })
}

/// Mapping key for an enum used as a map key: the name or the ordinal as text.
pub fn enum_to_key<E: NodeEnum>(value: &E) -> String {
    if E::BY_NAME {
        value.name().to_string()
    } else {
        value.ordinal().to_string()
    }
}

pub fn enum_from_key<E: NodeEnum>(key: &str) -> Result<E> {
    if E::BY_NAME {
        return enum_from_name(&Node::Text(key.to_string()));
    }
    let ordinal: i64 = key.parse().map_err(|e: std::num::ParseIntError| {
        DeserializationError::InvalidText {
            target: E::NAME,
            message: e.to_string(),
        }
    })?;
    enum_from_ordinal(&Node::Int(ordinal))
}

/// Field-level by-name representation, lifted through `Option` and `Vec`.
pub trait ByName: Sized {
    fn to_name_node(&self) -> Result<Node>;

    fn from_name_node(node: &Node) -> Result<Self>;
}

impl<T: ByName> ByName for Option<T> {
    fn to_name_node(&self) -> Result<Node> {
        match self {
            Some(inner) => inner.to_name_node(),
            None => Ok(Node::Nil),
        }
    }

    fn from_name_node(node: &Node) -> Result<Self> {
        match node {
            Node::Nil => Ok(None),
            other => T::from_name_node(other).map(Some),
        }
    }
}

impl<T: ByName> ByName for Vec<T> {
    fn to_name_node(&self) -> Result<Node> {
        self.iter().map(ByName::to_name_node).collect()
    }

    fn from_name_node(node: &Node) -> Result<Self> {
        node.as_sequence()?.iter().map(T::from_name_node).collect()
    }
}
