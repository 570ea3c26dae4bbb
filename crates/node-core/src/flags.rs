//! Bit-flag sets over a [`NodeEnum`] whose discriminants are the flag bits.
//!
//! A set serializes as the Sequence of its individually-set flags, in variant
//! declaration order, each in the enum's own representation. Deserialization
//! ORs the decoded elements together, so duplicates and any order are accepted.
//!
//! ```
//! use node_core::{FlagSet, NodeEnum, serialize};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, NodeEnum)]
//! #[node(by_name)]
//! enum Perm {
//!     Read = 1,
//!     Write = 2,
//!     Exec = 4,
//! }
//!
//! let perms: FlagSet<Perm> = [Perm::Exec, Perm::Read].into_iter().collect();
//! assert_eq!(perms.bits(), 5);
//! assert_eq!(serialize(&perms).unwrap().to_string(), "[text(Read), text(Exec)]");
//! ```

use crate::de::FromNode;
use crate::enums::NodeEnum;
use crate::error::Result;
use crate::node::Node;
use crate::ser::ToNode;
use std::fmt;
use std::marker::PhantomData;

/// A set of `E` flags stored as the OR of their discriminants.
///
/// This is not a `bitflags` struct: every member has to serialize as its own
/// `E` value (ordinal or symbol), so the set is generic over a derived
/// [`NodeEnum`] instead of generating a bits type per flag set.
pub struct FlagSet<E> {
    bits: u64,
    _flags: PhantomData<E>,
}

impl<E: NodeEnum> FlagSet<E> {
    pub fn empty() -> Self {
        Self::from_bits(0)
    }

    pub fn from_bits(bits: u64) -> Self {
        Self {
            bits,
            _flags: PhantomData,
        }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn insert(&mut self, flag: E) {
        self.bits |= flag_bits(flag);
    }

    pub fn remove(&mut self, flag: E) {
        self.bits &= !flag_bits(flag);
    }

    pub fn contains(&self, flag: E) -> bool {
        let bits = flag_bits(flag);
        bits != 0 && self.bits & bits == bits
    }

    /// Set flags in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = E> + '_ {
        E::VARIANTS.iter().copied().filter(|f| self.contains(*f))
    }
}

fn flag_bits<E: NodeEnum>(flag: E) -> u64 {
    flag.ordinal() as u64
}

impl<E> Clone for FlagSet<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FlagSet<E> {}

impl<E> PartialEq for FlagSet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E> Eq for FlagSet<E> {}

impl<E: NodeEnum> Default for FlagSet<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E: NodeEnum + fmt::Debug> fmt::Debug for FlagSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<E: NodeEnum> FromIterator<E> for FlagSet<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl<E: NodeEnum> From<E> for FlagSet<E> {
    fn from(flag: E) -> Self {
        Self::from_bits(flag_bits(flag))
    }
}

impl<E: NodeEnum + ToNode> ToNode for FlagSet<E> {
    fn to_node(&self) -> Result<Node> {
        self.iter().map(|flag| flag.to_node()).collect()
    }
}

impl<E: NodeEnum + FromNode> FromNode for FlagSet<E> {
    fn from_node(node: &Node) -> Result<Self> {
        let mut set = Self::empty();
        for item in node.as_sequence()? {
            set.insert(E::from_node(item)?);
        }
        Ok(set)
    }
}
