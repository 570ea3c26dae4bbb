//! Typed value → [`Node`] conversion.
//!
//! [`ToNode`] is implemented here for primitives, pointers, optionals, tuples
//! and the std collections. Records and unit-only enums get it from
//! `#[derive(Record)]` / `#[derive(NodeEnum)]`; date/time types in
//! [`crate::time`].
//!
//! Byte lists (`Vec<u8>`, `[u8; N]`, `&[u8]`) become `Bytes` through the
//! element-level [`ToNode::list_to_node`] hook; every other list becomes a
//! `Sequence`. The forced-array form ([`ToNode::to_node_array`]) turns byte
//! lists back into per-element sequences and records into positional ones.

use crate::error::{NodeError, Result};
use crate::keys::MapKey;
use crate::node::{Mapping, Node};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

/// Convert a typed value into a [`Node`].
pub trait ToNode {
    fn to_node(&self) -> Result<Node>;

    /// Serialize under the forced-array policy. Defaults to [`ToNode::to_node`].
    fn to_node_array(&self) -> Result<Node> {
        self.to_node()
    }

    /// Push this value's positional slots. Tuples occupy one slot per element.
    fn flatten_into(&self, slots: &mut Vec<Node>) -> Result<()> {
        slots.push(self.to_node()?);
        Ok(())
    }

    /// Serialize a homogeneous list of `Self`.
    #[doc(hidden)]
    fn list_to_node(items: &[Self]) -> Result<Node>
    where
        Self: Sized,
    {
        items.iter().map(ToNode::to_node).collect()
    }
}

/// Serialize `value` into a fresh node graph.
///
/// ```
/// use node_core::{serialize, Node};
///
/// assert_eq!(serialize(&Some(3u16)).unwrap(), Node::UInt(3));
/// assert_eq!(serialize(&vec![1u8, 2]).unwrap(), Node::Bytes(vec![1, 2]));
/// ```
pub fn serialize<T: ToNode + ?Sized>(value: &T) -> Result<Node> {
    value.to_node()
}

// ============================================================================
// Primitives
// ============================================================================

impl ToNode for Node {
    fn to_node(&self) -> Result<Node> {
        Ok(self.clone())
    }
}

impl ToNode for () {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Nil)
    }
}

impl<T: ?Sized> ToNode for PhantomData<T> {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Nil)
    }
}

macro_rules! to_node_via_from {
    ($($t:ty),*) => {$(
        impl ToNode for $t {
            fn to_node(&self) -> Result<Node> {
                Ok(Node::from(*self))
            }
        }
    )*};
}

to_node_via_from!(bool, i8, i16, i32, i64, isize, u16, u32, u64, usize, f32, f64, char);

impl ToNode for u8 {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::UInt(*self as u64))
    }

    fn list_to_node(items: &[Self]) -> Result<Node> {
        Ok(Node::Bytes(items.to_vec()))
    }
}

impl ToNode for i128 {
    fn to_node(&self) -> Result<Node> {
        i64::try_from(*self)
            .map(Node::Int)
            .map_err(|_| NodeError::Unsupported(format!("i128 value {self} exceeds 64 bits")))
    }
}

impl ToNode for u128 {
    fn to_node(&self) -> Result<Node> {
        u64::try_from(*self)
            .map(Node::UInt)
            .map_err(|_| NodeError::Unsupported(format!("u128 value {self} exceeds 64 bits")))
    }
}

impl ToNode for str {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Text(self.to_string()))
    }
}

impl ToNode for String {
    fn to_node(&self) -> Result<Node> {
        Ok(Node::Text(self.clone()))
    }
}

// ============================================================================
// Pointers and optionals
// ============================================================================

impl<T: ToNode + ?Sized> ToNode for &T {
    fn to_node(&self) -> Result<Node> {
        (**self).to_node()
    }

    fn to_node_array(&self) -> Result<Node> {
        (**self).to_node_array()
    }

    fn flatten_into(&self, slots: &mut Vec<Node>) -> Result<()> {
        (**self).flatten_into(slots)
    }
}

macro_rules! to_node_pointer {
    ($($p:ident),*) => {$(
        impl<T: ToNode + ?Sized> ToNode for $p<T> {
            fn to_node(&self) -> Result<Node> {
                (**self).to_node()
            }

            fn to_node_array(&self) -> Result<Node> {
                (**self).to_node_array()
            }

            fn flatten_into(&self, slots: &mut Vec<Node>) -> Result<()> {
                (**self).flatten_into(slots)
            }
        }
    )*};
}

to_node_pointer!(Box, Rc, Arc);

impl<T: ToNode> ToNode for Option<T> {
    fn to_node(&self) -> Result<Node> {
        match self {
            Some(inner) => inner.to_node(),
            None => Ok(Node::Nil),
        }
    }

    fn to_node_array(&self) -> Result<Node> {
        match self {
            Some(inner) => inner.to_node_array(),
            None => Ok(Node::Nil),
        }
    }
}

// ============================================================================
// Lists and sets
// ============================================================================

impl<T: ToNode> ToNode for [T] {
    fn to_node(&self) -> Result<Node> {
        T::list_to_node(self)
    }

    fn to_node_array(&self) -> Result<Node> {
        self.iter().map(ToNode::to_node_array).collect()
    }
}

impl<T: ToNode, const N: usize> ToNode for [T; N] {
    fn to_node(&self) -> Result<Node> {
        T::list_to_node(self)
    }

    fn to_node_array(&self) -> Result<Node> {
        self.as_slice().to_node_array()
    }
}

impl<T: ToNode> ToNode for Vec<T> {
    fn to_node(&self) -> Result<Node> {
        T::list_to_node(self)
    }

    fn to_node_array(&self) -> Result<Node> {
        self.as_slice().to_node_array()
    }
}

impl<T: ToNode> ToNode for VecDeque<T> {
    fn to_node(&self) -> Result<Node> {
        self.iter().map(ToNode::to_node).collect()
    }
}

impl<T: ToNode> ToNode for BTreeSet<T> {
    fn to_node(&self) -> Result<Node> {
        self.iter().map(ToNode::to_node).collect()
    }
}

impl<T: ToNode, S> ToNode for HashSet<T, S> {
    fn to_node(&self) -> Result<Node> {
        self.iter().map(ToNode::to_node).collect()
    }
}

// ============================================================================
// Associative containers
// ============================================================================

fn entries_to_node<'a, K, V, I>(entries: I) -> Result<Node>
where
    K: MapKey + 'a,
    V: ToNode + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut map = Mapping::new();
    for (k, v) in entries {
        map.insert(k.to_key(), v.to_node()?);
    }
    Ok(Node::Mapping(map))
}

impl<K: MapKey, V: ToNode, S> ToNode for HashMap<K, V, S> {
    fn to_node(&self) -> Result<Node> {
        entries_to_node(self)
    }
}

impl<K: MapKey, V: ToNode> ToNode for BTreeMap<K, V> {
    fn to_node(&self) -> Result<Node> {
        entries_to_node(self)
    }
}

// ============================================================================
// Tuples
// ============================================================================

macro_rules! to_node_tuple {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: ToNode),+> ToNode for ($($name,)+) {
            fn to_node(&self) -> Result<Node> {
                Ok(Node::Sequence(vec![$(self.$idx.to_node()?),+]))
            }

            fn flatten_into(&self, slots: &mut Vec<Node>) -> Result<()> {
                $(slots.push(self.$idx.to_node()?);)+
                Ok(())
            }
        }
    };
}

to_node_tuple!(A.0);
to_node_tuple!(A.0, B.1);
to_node_tuple!(A.0, B.1, C.2);
to_node_tuple!(A.0, B.1, C.2, D.3);
to_node_tuple!(A.0, B.1, C.2, D.3, E.4);
to_node_tuple!(A.0, B.1, C.2, D.3, E.4, F.5);
to_node_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6);
to_node_tuple!(A.0, B.1, C.2, D.3, E.4, F.5, G.6, H.7);
