//! [`Node`] → typed value conversion, the mirror of [`crate::ser`].
//!
//! Primitive targets go through the coercion table of [`Node::get`]; containers
//! walk their children. Unknown mapping keys and surplus sequence slots are
//! ignored by records (see [`crate::record`]); fixed-arity targets (tuples,
//! arrays) reject a wrong element count.

use crate::convert::Coerce;
use crate::error::{DeserializationError, NodeError, Result};
use crate::keys::MapKey;
use crate::node::{Mapping, Node};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

/// Rebuild a typed value from a [`Node`].
pub trait FromNode: Sized {
    fn from_node(node: &Node) -> Result<Self>;

    /// Deserialize under the forced-array policy. Defaults to [`FromNode::from_node`].
    fn from_node_array(node: &Node) -> Result<Self> {
        Self::from_node(node)
    }

    /// Consume this value's positional slots. Tuples consume one per element.
    fn from_slots(slots: &mut Slots<'_>) -> Result<Self> {
        Self::from_node(slots.take()?)
    }

    #[doc(hidden)]
    fn list_from_node(node: &Node) -> Result<Vec<Self>> {
        node.as_sequence()?.iter().map(Self::from_node).collect()
    }
}

/// Rebuild a `T` from `node`.
///
/// ```
/// use node_core::{deserialize, Node};
///
/// let pair: (u8, String) = deserialize(&node_core::seq![1, "one"]).unwrap();
/// assert_eq!(pair, (1, "one".to_string()));
/// ```
pub fn deserialize<T: FromNode>(node: &Node) -> Result<T> {
    T::from_node(node)
}

/// Cursor over the elements of a positional (forced-array) sequence.
#[derive(Debug, Clone)]
pub struct Slots<'a> {
    items: &'a [Node],
    pos: usize,
    target: &'static str,
}

impl<'a> Slots<'a> {
    pub fn new(items: &'a [Node], target: &'static str) -> Self {
        Self {
            items,
            pos: 0,
            target,
        }
    }

    /// Take the next slot; running out is a count mismatch against `target`.
    pub fn take(&mut self) -> Result<&'a Node> {
        let node = self.items.get(self.pos).ok_or(DeserializationError::CountMismatch {
            target: self.target,
            expected: self.pos + 1,
            actual: self.items.len(),
        })?;
        self.pos += 1;
        Ok(node)
    }

    pub fn peek(&self) -> Option<&'a Node> {
        self.items.get(self.pos)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.items.len()
    }

    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.pos)
    }

    pub fn target(&self) -> &'static str {
        self.target
    }
}

// ============================================================================
// Primitives
// ============================================================================

impl FromNode for Node {
    fn from_node(node: &Node) -> Result<Self> {
        Ok(node.clone())
    }
}

impl FromNode for () {
    fn from_node(_: &Node) -> Result<Self> {
        Ok(())
    }
}

impl<T: ?Sized> FromNode for PhantomData<T> {
    fn from_node(_: &Node) -> Result<Self> {
        Ok(PhantomData)
    }
}

macro_rules! from_node_via_coerce {
    ($($t:ty),*) => {$(
        impl FromNode for $t {
            fn from_node(node: &Node) -> Result<Self> {
                Ok(<$t as Coerce>::coerce(node)?)
            }
        }
    )*};
}

from_node_via_coerce!(bool, i8, i16, i32, i64, isize, u16, u32, u64, usize, f32, f64, String);

impl FromNode for u8 {
    fn from_node(node: &Node) -> Result<Self> {
        Ok(u8::coerce(node)?)
    }

    /// Byte lists come back from `Bytes`, or element-wise from a Sequence.
    fn list_from_node(node: &Node) -> Result<Vec<Self>> {
        match node {
            Node::Bytes(bytes) => Ok(bytes.clone()),
            other => other.as_sequence()?.iter().map(u8::from_node).collect(),
        }
    }
}

impl FromNode for i128 {
    fn from_node(node: &Node) -> Result<Self> {
        match node {
            Node::UInt(u) => Ok(i128::from(*u)),
            other => Ok(i128::from(i64::coerce(other)?)),
        }
    }
}

impl FromNode for u128 {
    fn from_node(node: &Node) -> Result<Self> {
        Ok(u128::from(u64::coerce(node)?))
    }
}

impl FromNode for char {
    fn from_node(node: &Node) -> Result<Self> {
        let text = node.as_str()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(DeserializationError::InvalidText {
                target: "char",
                message: format!("`{text}` is not a single character"),
            }
            .into()),
        }
    }
}

// ============================================================================
// Pointers and optionals
// ============================================================================

impl<T: FromNode> FromNode for Option<T> {
    fn from_node(node: &Node) -> Result<Self> {
        match node {
            Node::Nil => Ok(None),
            other => T::from_node(other).map(Some),
        }
    }

    fn from_node_array(node: &Node) -> Result<Self> {
        match node {
            Node::Nil => Ok(None),
            other => T::from_node_array(other).map(Some),
        }
    }
}

macro_rules! from_node_pointer {
    ($($p:ident),*) => {$(
        impl<T: FromNode> FromNode for $p<T> {
            fn from_node(node: &Node) -> Result<Self> {
                T::from_node(node).map($p::new)
            }

            fn from_node_array(node: &Node) -> Result<Self> {
                T::from_node_array(node).map($p::new)
            }

            fn from_slots(slots: &mut Slots<'_>) -> Result<Self> {
                T::from_slots(slots).map($p::new)
            }
        }
    )*};
}

from_node_pointer!(Box, Rc, Arc);

// ============================================================================
// Lists and sets
// ============================================================================

fn elements_array<T: FromNode>(node: &Node) -> Result<Vec<T>> {
    node.as_sequence()?.iter().map(T::from_node_array).collect()
}

impl<T: FromNode> FromNode for Vec<T> {
    fn from_node(node: &Node) -> Result<Self> {
        T::list_from_node(node)
    }

    fn from_node_array(node: &Node) -> Result<Self> {
        elements_array(node)
    }
}

fn fixed<T, const N: usize>(items: Vec<T>) -> Result<[T; N]> {
    let actual = items.len();
    items.try_into().map_err(|_| {
        NodeError::from(DeserializationError::CountMismatch {
            target: std::any::type_name::<[T; N]>(),
            expected: N,
            actual,
        })
    })
}

impl<T: FromNode, const N: usize> FromNode for [T; N] {
    fn from_node(node: &Node) -> Result<Self> {
        fixed(T::list_from_node(node)?)
    }

    fn from_node_array(node: &Node) -> Result<Self> {
        fixed(elements_array(node)?)
    }
}

impl<T: FromNode> FromNode for VecDeque<T> {
    fn from_node(node: &Node) -> Result<Self> {
        node.as_sequence()?.iter().map(T::from_node).collect()
    }
}

impl<T: FromNode + Ord> FromNode for BTreeSet<T> {
    fn from_node(node: &Node) -> Result<Self> {
        node.as_sequence()?.iter().map(T::from_node).collect()
    }
}

impl<T, S> FromNode for HashSet<T, S>
where
    T: FromNode + Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_node(node: &Node) -> Result<Self> {
        node.as_sequence()?.iter().map(T::from_node).collect()
    }
}

// ============================================================================
// Associative containers
// ============================================================================

fn entries_from_node<K, V, M>(node: &Node) -> Result<M>
where
    K: MapKey,
    V: FromNode,
    M: FromIterator<(K, V)>,
{
    let map: &Mapping = node.as_mapping()?;
    map.iter()
        .map(|(k, v)| -> Result<(K, V)> { Ok((K::from_key(k)?, V::from_node(v)?)) })
        .collect()
}

impl<K, V, S> FromNode for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: FromNode,
    S: BuildHasher + Default,
{
    fn from_node(node: &Node) -> Result<Self> {
        entries_from_node(node)
    }
}

impl<K: MapKey + Ord, V: FromNode> FromNode for BTreeMap<K, V> {
    fn from_node(node: &Node) -> Result<Self> {
        entries_from_node(node)
    }
}

// ============================================================================
// Tuples
// ============================================================================

macro_rules! from_node_tuple {
    ($len:expr => $($name:ident),+) => {
        impl<$($name: FromNode),+> FromNode for ($($name,)+) {
            fn from_node(node: &Node) -> Result<Self> {
                let items = node.as_sequence()?;
                if items.len() != $len {
                    return Err(DeserializationError::CountMismatch {
                        target: std::any::type_name::<Self>(),
                        expected: $len,
                        actual: items.len(),
                    }
                    .into());
                }
                let mut slots = Slots::new(items, std::any::type_name::<Self>());
                Ok(($($name::from_node(slots.take()?)?,)+))
            }

            fn from_slots(slots: &mut Slots<'_>) -> Result<Self> {
                Ok(($($name::from_node(slots.take()?)?,)+))
            }
        }
    };
}

from_node_tuple!(1 => A);
from_node_tuple!(2 => A, B);
from_node_tuple!(3 => A, B, C);
from_node_tuple!(4 => A, B, C, D);
from_node_tuple!(5 => A, B, C, D, E);
from_node_tuple!(6 => A, B, C, D, E, F);
from_node_tuple!(7 => A, B, C, D, E, F, G);
from_node_tuple!(8 => A, B, C, D, E, F, G, H);
