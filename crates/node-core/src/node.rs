//! The `Node` value model: a closed tagged union over nil, booleans, integers,
//! floats, text, bytes, sequences and string-keyed mappings.
//!
//! A `Node` owns its children outright: cloning deep-copies the graph, and
//! mutation through one handle is never visible through a clone.
//!
//! # Equality and hashing
//!
//! Equality is structural. `Int` and `UInt` compare equal when they hold the
//! same integer (`Node::Int(5) == Node::UInt(5)`) and hash identically, so both
//! can be used interchangeably as `HashSet` members. Floats compare by value with
//! `NaN == NaN` so that `Eq` holds; every other cross-variant comparison is
//! unequal.
//!
//! # Example
//! ```
//! use node_core::{Kind, Node};
//!
//! let mut list = Node::from(Vec::<Node>::new());
//! list.append(1).unwrap();
//! list.append(node_core::seq![2u8, "three"]).unwrap();
//! assert_eq!(list.len().unwrap(), 3);
//! assert_eq!(list[2].kind(), Kind::Text);
//! assert_eq!(list.to_string(), "[int(1), uint(2), text(three)]");
//! ```

use crate::convert::Coerce;
use crate::error::ConversionError;
use std::collections::{btree_map, BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

/// String-keyed children of a `Mapping` node. Keys iterate in lexical order.
pub type Mapping = BTreeMap<String, Node>;

/// Discriminant of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    UInt,
    Float,
    Text,
    Bytes,
    Sequence,
    Mapping,
}

impl Kind {
    /// Every kind, `Nil` first. The dispatcher resolves handlers over this set.
    pub const ALL: [Kind; 9] = [
        Kind::Nil,
        Kind::Bool,
        Kind::Int,
        Kind::UInt,
        Kind::Float,
        Kind::Text,
        Kind::Bytes,
        Kind::Sequence,
        Kind::Mapping,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::UInt => "uint",
            Kind::Float => "float",
            Kind::Text => "text",
            Kind::Bytes => "bytes",
            Kind::Sequence => "sequence",
            Kind::Mapping => "mapping",
        }
    }

    /// Position within [`Kind::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically-typed value.
#[derive(Debug, Clone, Default)]
pub enum Node {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

/// Position of a child yielded by [`Node::entries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Nil => Kind::Nil,
            Node::Bool(_) => Kind::Bool,
            Node::Int(_) => Kind::Int,
            Node::UInt(_) => Kind::UInt,
            Node::Float(_) => Kind::Float,
            Node::Text(_) => Kind::Text,
            Node::Bytes(_) => Kind::Bytes,
            Node::Sequence(_) => Kind::Sequence,
            Node::Mapping(_) => Kind::Mapping,
        }
    }

    /// Build a Sequence from anything convertible into nodes.
    pub fn sequence_of<I, T>(items: I) -> Node
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        Node::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// An empty Mapping.
    pub fn mapping() -> Node {
        Node::Mapping(Mapping::new())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Node::Nil)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Node::Bool(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Node::Int(_))
    }

    pub fn is_uint(&self) -> bool {
        matches!(self, Node::UInt(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Node::Float(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Node::Bytes(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    // ------------------------------------------------------------------
    // Conversion
    // ------------------------------------------------------------------

    /// Convert the active variant into `T` following the coercion table in
    /// [`crate::convert`].
    pub fn get<T: Coerce>(&self) -> Result<T, ConversionError> {
        T::coerce(self)
    }

    /// Like [`Node::get`], but a failed conversion yields `None`.
    pub fn opt<T: Coerce>(&self) -> Option<T> {
        T::coerce(self).ok()
    }

    pub fn as_str(&self) -> Result<&str, ConversionError> {
        match self {
            Node::Text(s) => Ok(s),
            other => Err(ConversionError::mismatch("text", other.kind())),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], ConversionError> {
        match self {
            Node::Bytes(b) => Ok(b),
            other => Err(ConversionError::mismatch("bytes", other.kind())),
        }
    }

    pub fn as_sequence(&self) -> Result<&Vec<Node>, ConversionError> {
        match self {
            Node::Sequence(items) => Ok(items),
            other => Err(ConversionError::mismatch("sequence", other.kind())),
        }
    }

    pub fn as_sequence_mut(&mut self) -> Result<&mut Vec<Node>, ConversionError> {
        match self {
            Node::Sequence(items) => Ok(items),
            other => Err(ConversionError::mismatch("sequence", other.kind())),
        }
    }

    pub fn as_mapping(&self) -> Result<&Mapping, ConversionError> {
        match self {
            Node::Mapping(map) => Ok(map),
            other => Err(ConversionError::mismatch("mapping", other.kind())),
        }
    }

    pub fn as_mapping_mut(&mut self) -> Result<&mut Mapping, ConversionError> {
        match self {
            Node::Mapping(map) => Ok(map),
            other => Err(ConversionError::mismatch("mapping", other.kind())),
        }
    }

    // ------------------------------------------------------------------
    // Size
    // ------------------------------------------------------------------

    /// Number of elements: UTF-8 bytes for Text, bytes for Bytes, children for
    /// Sequence and Mapping. Scalars have no length.
    pub fn len(&self) -> Result<usize, ConversionError> {
        match self {
            Node::Text(s) => Ok(s.len()),
            Node::Bytes(b) => Ok(b.len()),
            Node::Sequence(items) => Ok(items.len()),
            Node::Mapping(map) => Ok(map.len()),
            other => Err(ConversionError::mismatch("sized value", other.kind())),
        }
    }

    pub fn is_empty(&self) -> Result<bool, ConversionError> {
        self.len().map(|n| n == 0)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Push onto a Sequence. Appending a Sequence splices its elements in place
    /// rather than nesting it.
    pub fn append(&mut self, value: impl Into<Node>) -> Result<(), ConversionError> {
        let items = self.as_sequence_mut()?;
        match value.into() {
            Node::Sequence(more) => items.extend(more),
            other => items.push(other),
        }
        Ok(())
    }

    /// Remove `key` from a Mapping, returning the old child if there was one.
    pub fn remove(&mut self, key: &str) -> Result<Option<Node>, ConversionError> {
        Ok(self.as_mapping_mut()?.remove(key))
    }

    /// Return the child at `key`, inserting `default` first if it is absent.
    pub fn require(
        &mut self,
        key: &str,
        default: impl Into<Node>,
    ) -> Result<&mut Node, ConversionError> {
        let map = self.as_mapping_mut()?;
        Ok(map.entry(key.to_string()).or_insert_with(|| default.into()))
    }

    pub fn contains(&self, key: &str) -> Result<bool, ConversionError> {
        Ok(self.as_mapping()?.contains_key(key))
    }

    /// Replace this node with Nil and return the previous value.
    pub fn take(&mut self) -> Node {
        std::mem::take(self)
    }

    // ------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------

    /// `(index, child)` pairs of a Sequence or `(key, child)` pairs of a Mapping.
    pub fn entries(&self) -> Result<Entries<'_>, ConversionError> {
        match self {
            Node::Sequence(items) => Ok(Entries::Sequence(items.iter().enumerate())),
            Node::Mapping(map) => Ok(Entries::Mapping(map.iter())),
            other => Err(ConversionError::mismatch("container", other.kind())),
        }
    }

    /// Mutable form of [`Node::entries`]; writes land in the container.
    pub fn entries_mut(&mut self) -> Result<EntriesMut<'_>, ConversionError> {
        match self {
            Node::Sequence(items) => Ok(EntriesMut::Sequence(items.iter_mut().enumerate())),
            Node::Mapping(map) => Ok(EntriesMut::Mapping(map.iter_mut())),
            other => Err(ConversionError::mismatch("container", other.kind())),
        }
    }

    /// Elements of a Sequence.
    pub fn values(&self) -> Result<std::slice::Iter<'_, Node>, ConversionError> {
        Ok(self.as_sequence()?.iter())
    }

    pub fn values_mut(&mut self) -> Result<std::slice::IterMut<'_, Node>, ConversionError> {
        Ok(self.as_sequence_mut()?.iter_mut())
    }
}

/// Iterator returned by [`Node::entries`].
#[derive(Debug, Clone)]
pub enum Entries<'a> {
    Sequence(std::iter::Enumerate<std::slice::Iter<'a, Node>>),
    Mapping(btree_map::Iter<'a, String, Node>),
}

impl<'a> Iterator for Entries<'a> {
    type Item = (Key<'a>, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Entries::Sequence(it) => it.next().map(|(i, n)| (Key::Index(i), n)),
            Entries::Mapping(it) => it.next().map(|(k, n)| (Key::Name(k.as_str()), n)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Entries::Sequence(it) => it.size_hint(),
            Entries::Mapping(it) => it.size_hint(),
        }
    }
}

/// Iterator returned by [`Node::entries_mut`].
#[derive(Debug)]
pub enum EntriesMut<'a> {
    Sequence(std::iter::Enumerate<std::slice::IterMut<'a, Node>>),
    Mapping(btree_map::IterMut<'a, String, Node>),
}

impl<'a> Iterator for EntriesMut<'a> {
    type Item = (Key<'a>, &'a mut Node);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            EntriesMut::Sequence(it) => it.next().map(|(i, n)| (Key::Index(i), n)),
            EntriesMut::Mapping(it) => it.next().map(|(k, n)| (Key::Name(k.as_str()), n)),
        }
    }
}

// ============================================================================
// Indexing
// ============================================================================

/// Element `index` of a Sequence.
///
/// # Panics
///
/// Panics with the [`ConversionError`] message if the node is not a Sequence,
/// and if `index` is out of range.
impl Index<usize> for Node {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        match self.as_sequence() {
            Ok(items) => &items[index],
            Err(e) => panic!("{e}"),
        }
    }
}

/// # Panics
///
/// Panics if the node is not a Sequence or `index` is out of range.
impl IndexMut<usize> for Node {
    fn index_mut(&mut self, index: usize) -> &mut Node {
        match self.as_sequence_mut() {
            Ok(items) => &mut items[index],
            Err(e) => panic!("{e}"),
        }
    }
}

/// Child `key` of a Mapping.
///
/// # Panics
///
/// Panics with the [`ConversionError`] message if the node is not a Mapping,
/// and if `key` is missing.
impl Index<&str> for Node {
    type Output = Node;

    fn index(&self, key: &str) -> &Node {
        match self.as_mapping() {
            Ok(map) => &map[key],
            Err(e) => panic!("{e}"),
        }
    }
}

/// Writing through a missing key inserts Nil first.
///
/// # Panics
///
/// Panics with the [`ConversionError`] message if the node is not a Mapping.
impl IndexMut<&str> for Node {
    fn index_mut(&mut self, key: &str) -> &mut Node {
        match self.as_mapping_mut() {
            Ok(map) => map.entry(key.to_string()).or_default(),
            Err(e) => panic!("{e}"),
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl From<()> for Node {
    fn from(_: ()) -> Self {
        Node::Nil
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Node {
            fn from(v: $t) -> Self {
                Node::Int(v as i64)
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Node {
            fn from(v: $t) -> Self {
                Node::UInt(v as u64)
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Node {
    fn from(v: f32) -> Self {
        Node::Float(v as f64)
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::Float(v)
    }
}

impl From<char> for Node {
    fn from(c: char) -> Self {
        Node::Text(c.to_string())
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

impl From<&[u8]> for Node {
    fn from(b: &[u8]) -> Self {
        Node::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Node {
    fn from(b: Vec<u8>) -> Self {
        Node::Bytes(b)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl From<HashMap<String, Node>> for Node {
    fn from(map: HashMap<String, Node>) -> Self {
        Node::Mapping(map.into_iter().collect())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        v.map_or(Node::Nil, Into::into)
    }
}

impl FromIterator<Node> for Node {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Node::Sequence(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Node::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ============================================================================
// Equality and hashing
// ============================================================================

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Nil, Node::Nil) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Int(a), Node::Int(b)) => a == b,
            (Node::UInt(a), Node::UInt(b)) => a == b,
            (Node::Int(i), Node::UInt(u)) | (Node::UInt(u), Node::Int(i)) => {
                *i >= 0 && *i as u64 == *u
            }
            (Node::Float(a), Node::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Node::Text(a), Node::Text(b)) => a == b,
            (Node::Bytes(a), Node::Bytes(b)) => a == b,
            (Node::Sequence(a), Node::Sequence(b)) => a == b,
            (Node::Mapping(a), Node::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Node {}

/// Non-negative integers hash as unsigned regardless of variant so that
/// `Int(n)` and `UInt(n)` collide.
impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Node::Nil => state.write_u8(0),
            Node::Bool(b) => {
                state.write_u8(1);
                b.hash(state);
            }
            Node::Int(i) if *i >= 0 => {
                state.write_u8(3);
                (*i as u64).hash(state);
            }
            Node::Int(i) => {
                state.write_u8(2);
                i.hash(state);
            }
            Node::UInt(u) => {
                state.write_u8(3);
                u.hash(state);
            }
            Node::Float(f) => {
                state.write_u8(4);
                let canonical = if *f == 0.0 {
                    0.0f64
                } else if f.is_nan() {
                    f64::NAN
                } else {
                    *f
                };
                canonical.to_bits().hash(state);
            }
            Node::Text(s) => {
                state.write_u8(5);
                s.hash(state);
            }
            Node::Bytes(b) => {
                state.write_u8(6);
                b.hash(state);
            }
            Node::Sequence(items) => {
                state.write_u8(7);
                items.hash(state);
            }
            Node::Mapping(map) => {
                state.write_u8(8);
                map.hash(state);
            }
        }
    }
}

// ============================================================================
// Debug rendering
// ============================================================================

/// `kind(payload)` for scalars, `[a, b]` for sequences, `{k:v, k:v}` for mappings.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Nil => f.write_str("nil"),
            Node::Bool(b) => write!(f, "bool({b})"),
            Node::Int(i) => write!(f, "int({i})"),
            Node::UInt(u) => write!(f, "uint({u})"),
            Node::Float(v) => write!(f, "float({v})"),
            Node::Text(s) => write!(f, "text({s})"),
            Node::Bytes(bytes) => {
                f.write_str("bytes(")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                f.write_str(")")
            }
            Node::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Node::Mapping(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("}")
            }
        }
    }
}
