//! # node-core
//!
//! A dynamically-typed value container ([`Node`]) with three layers on top:
//!
//! - a **type-directed dispatcher** that resolves typed handlers against a
//!   node's active kind by storage-width distance, with exhaustiveness and
//!   unreachable-handler checks at construction;
//! - a **structural serialization engine** converting records, enums, tuples,
//!   collections and date/time values to and from nodes, driven by per-field
//!   `#[node(...)]` policy;
//! - a **path tree** for dot-path access and layered merging of
//!   configuration-shaped data.
//!
//! ## Quick start
//!
//! ```rust
//! use node_core::{deserialize, serialize, Node, Record};
//!
//! #[derive(Debug, PartialEq, Record)]
//! struct Server {
//!     host: String,
//!     #[node(rename = "listen")]
//!     port: u16,
//!     #[node(optional)]
//!     workers: u32,
//! }
//!
//! let server = Server { host: "example.org".into(), port: 8080, workers: 4 };
//! let node = serialize(&server).unwrap();
//! assert_eq!(node["listen"], Node::UInt(8080));
//!
//! let back: Server = deserialize(&node).unwrap();
//! assert_eq!(back, server);
//! ```
//!
//! ## Modules
//!
//! - [`node`]: the `Node` tagged union, accessors, mutation and iteration
//! - [`convert`]: coercion table behind `Node::get` / `Node::opt`
//! - [`dispatch`]: handler resolution (`Handlers`, `Dispatcher`)
//! - [`ser`] / [`de`]: `ToNode` / `FromNode` and their std implementations
//! - [`record`]: field descriptors and the record walk used by `#[derive(Record)]`
//! - [`enums`] / [`flags`]: unit enums and bit-flag sets
//! - [`time`]: ISO-8601 date/time shapes (feature `chrono`)
//! - [`tree`]: dot-path `Tree` with merge
//! - [`error`]: error types

extern crate self as node_core;

pub mod convert;
pub mod de;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod flags;
pub mod keys;
pub mod node;
pub mod record;
pub mod ser;
#[cfg(feature = "serde")]
mod serde_impl;
#[cfg(feature = "chrono")]
pub mod time;
pub mod tree;

pub use convert::Coerce;
pub use de::{deserialize, FromNode, Slots};
pub use dispatch::{DispatchMode, Dispatcher, Handlers, Param};
pub use enums::{ByName, NodeEnum};
pub use error::{ConversionError, ConversionReason, DeserializationError, MatchError, NodeError};
pub use flags::FlagSet;
pub use keys::MapKey;
pub use node::{Key, Kind, Mapping, Node};
pub use record::{FieldDescriptor, FieldPolicy, Record};
pub use ser::{serialize, ToNode};
pub use tree::Tree;

#[cfg(feature = "derive")]
pub use node_derive::{NodeEnum, Record};

/// Build a Sequence from heterogeneous values.
///
/// ```
/// use node_core::{seq, Node};
///
/// let n = seq![1, "two", 3.0, true];
/// assert_eq!(n.len().unwrap(), 4);
/// assert_eq!(n[1], Node::from("two"));
/// ```
#[macro_export]
macro_rules! seq {
    () => {
        $crate::Node::Sequence(::std::vec::Vec::new())
    };
    ($($item:expr),+ $(,)?) => {
        $crate::Node::Sequence(::std::vec![$($crate::Node::from($item)),+])
    };
}
