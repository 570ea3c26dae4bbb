//! Type-directed dispatch: pick one handler for a node's active kind.
//!
//! Handlers are registered in order on a [`Handlers`] builder and resolved once,
//! per kind, into a [`Dispatcher`] table:
//!
//! - **Typed** (`on(|x: P| ..)`): eligible when `P` belongs to the kind's
//!   family. An exact width match ranks first; otherwise the rank grows with the
//!   difference in storage width (in bytes) between `P` and the kind's natural
//!   64-bit payload, so `i32` beats `i16` on an `Int`. A typed handler never
//!   crosses families (`bool` does not match `Int`).
//! - **Template** (`any(|n: &Node| ..)`): eligible for every kind, ranked just
//!   below an exact typed match and above every narrower or wider one.
//! - **Fallback** (`otherwise(|| ..)`): eligible for every kind, ranked last.
//!
//! Ties go to the earlier registration. Construction fails if a handler never
//! wins for any kind, and in [`DispatchMode::Exhaustive`] also if some kind is
//! left without a handler.
//!
//! # Example
//! ```
//! use node_core::{Handlers, Node};
//!
//! let label = Handlers::new()
//!     .on(|_: u8| "byte")
//!     .on(|_: f32| "float")
//!     .otherwise(|| "other")
//!     .exhaustive()
//!     .unwrap();
//!
//! assert_eq!(label.dispatch(&Node::from(true)).unwrap(), "other");
//! assert_eq!(label.dispatch(&Node::from(7u8)).unwrap(), "byte");
//! ```

use crate::convert::Coerce;
use crate::error::{MatchError, NodeError, Result};
use crate::node::{Kind, Mapping, Node};
use std::fmt;

/// Families a handler parameter can belong to; one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Nil,
    Bool,
    Signed,
    Unsigned,
    Float,
    Text,
    Bytes,
    Sequence,
    Mapping,
}

impl Family {
    /// Family and natural storage width (bytes) of a kind's payload.
    fn of(kind: Kind) -> (Family, u8) {
        match kind {
            Kind::Nil => (Family::Nil, 0),
            Kind::Bool => (Family::Bool, 1),
            Kind::Int => (Family::Signed, 8),
            Kind::UInt => (Family::Unsigned, 8),
            Kind::Float => (Family::Float, 8),
            Kind::Text => (Family::Text, 0),
            Kind::Bytes => (Family::Bytes, 0),
            Kind::Sequence => (Family::Sequence, 0),
            Kind::Mapping => (Family::Mapping, 0),
        }
    }
}

/// A concrete parameter type a typed handler may declare.
pub trait Param: Coerce {
    const FAMILY: Family;
    /// Storage width in bytes; zero for non-numeric families.
    const WIDTH: u8;
}

macro_rules! param {
    ($($t:ty => $family:ident),* $(,)?) => {$(
        impl Param for $t {
            const FAMILY: Family = Family::$family;
            const WIDTH: u8 = std::mem::size_of::<$t>() as u8;
        }
    )*};
}

param! {
    bool => Bool,
    i8 => Signed, i16 => Signed, i32 => Signed, i64 => Signed,
    u8 => Unsigned, u16 => Unsigned, u32 => Unsigned, u64 => Unsigned,
    f32 => Float, f64 => Float,
}

macro_rules! param_unsized {
    ($($t:ty => $family:ident),* $(,)?) => {$(
        impl Param for $t {
            const FAMILY: Family = Family::$family;
            const WIDTH: u8 = 0;
        }
    )*};
}

param_unsized! {
    String => Text,
    Vec<u8> => Bytes,
    Vec<Node> => Sequence,
    Mapping => Mapping,
}

/// Lower is better.
type Distance = u32;

const EXACT: Distance = 0;
const TEMPLATE: Distance = 1;
const EMPTY: Distance = Distance::MAX - 1;
const INELIGIBLE: Distance = Distance::MAX;

#[derive(Debug, Clone, Copy)]
enum Class {
    Function { family: Family, width: u8 },
    Template,
    Empty,
}

impl Class {
    fn distance(self, kind: Kind) -> Distance {
        match self {
            Class::Function { family, width } => {
                let (kind_family, kind_width) = Family::of(kind);
                if family != kind_family {
                    return INELIGIBLE;
                }
                match kind_width.abs_diff(width) {
                    0 => EXACT,
                    diff => TEMPLATE + Distance::from(diff),
                }
            }
            Class::Template => TEMPLATE,
            Class::Empty => EMPTY,
        }
    }
}

type Call<'a, R> = Box<dyn Fn(&Node) -> Result<R> + 'a>;

struct Entry<'a, R> {
    class: Class,
    call: Call<'a, R>,
}

/// Whether every kind must be covered when the dispatcher is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Uncovered kinds are a construction error.
    #[default]
    Exhaustive,
    /// Uncovered kinds fail only when such a node is dispatched.
    BestEffort,
}

/// Ordered handler registrations, resolved by [`Handlers::build`].
pub struct Handlers<'a, R> {
    entries: Vec<Entry<'a, R>>,
    fallback_seen: bool,
    duplicate_fallback: bool,
}

impl<R> Default for Handlers<'_, R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            fallback_seen: false,
            duplicate_fallback: false,
        }
    }
}

impl<'a, R> Handlers<'a, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a concrete parameter type.
    pub fn on<P, F>(mut self, f: F) -> Self
    where
        P: Param,
        F: Fn(P) -> R + 'a,
    {
        self.entries.push(Entry {
            class: Class::Function {
                family: P::FAMILY,
                width: P::WIDTH,
            },
            call: Box::new(move |node: &Node| Ok(f(P::coerce(node)?))),
        });
        self
    }

    /// Register a handler receiving the node itself, eligible for every kind.
    pub fn any<F>(mut self, f: F) -> Self
    where
        F: Fn(&Node) -> R + 'a,
    {
        self.entries.push(Entry {
            class: Class::Template,
            call: Box::new(move |node: &Node| Ok(f(node))),
        });
        self
    }

    /// Register the zero-argument catch-all. At most one is allowed.
    pub fn otherwise<F>(mut self, f: F) -> Self
    where
        F: Fn() -> R + 'a,
    {
        if self.fallback_seen {
            self.duplicate_fallback = true;
        }
        self.fallback_seen = true;
        self.entries.push(Entry {
            class: Class::Empty,
            call: Box::new(move |_: &Node| Ok(f())),
        });
        self
    }

    pub fn exhaustive(self) -> std::result::Result<Dispatcher<'a, R>, MatchError> {
        self.build(DispatchMode::Exhaustive)
    }

    pub fn best_effort(self) -> std::result::Result<Dispatcher<'a, R>, MatchError> {
        self.build(DispatchMode::BestEffort)
    }

    /// Resolve the winning handler for every kind and validate the set.
    pub fn build(self, mode: DispatchMode) -> std::result::Result<Dispatcher<'a, R>, MatchError> {
        if self.duplicate_fallback {
            return Err(MatchError::DuplicateFallback);
        }

        let mut table = [None; Kind::ALL.len()];
        for kind in Kind::ALL {
            let mut best: Option<(usize, Distance)> = None;
            for (index, entry) in self.entries.iter().enumerate() {
                let distance = entry.class.distance(kind);
                if distance == INELIGIBLE {
                    continue;
                }
                // Strictly better only: earlier registrations keep ties.
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((index, distance));
                }
            }
            match best {
                Some((index, _)) => table[kind.index()] = Some(index),
                None if mode == DispatchMode::Exhaustive => {
                    return Err(MatchError::Unhandled { kind });
                }
                None => {}
            }
        }

        for index in 0..self.entries.len() {
            if !table.contains(&Some(index)) {
                return Err(MatchError::UnreachableHandler { index });
            }
        }

        tracing::debug!(
            ?mode,
            handlers = self.entries.len(),
            ?table,
            "resolved dispatch table"
        );

        Ok(Dispatcher {
            entries: self.entries,
            table,
            mode,
        })
    }
}

/// A validated handler set with a resolved per-kind table.
pub struct Dispatcher<'a, R> {
    entries: Vec<Entry<'a, R>>,
    table: [Option<usize>; Kind::ALL.len()],
    mode: DispatchMode,
}

impl<R> fmt::Debug for Dispatcher<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.entries.len())
            .field("table", &self.table)
            .field("mode", &self.mode)
            .finish()
    }
}

impl<R> Dispatcher<'_, R> {
    /// Invoke the handler chosen for `node`'s kind.
    pub fn dispatch(&self, node: &Node) -> Result<R> {
        let kind = node.kind();
        let index = self.table[kind.index()].ok_or(MatchError::NoMatch { kind })?;
        (self.entries[index].call)(node)
    }

    /// Registration index of the handler that wins for `kind`.
    pub fn winner(&self, kind: Kind) -> Option<usize> {
        self.table[kind.index()]
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }
}

impl Node {
    /// Build an exhaustive dispatcher from `handlers` and run it once.
    pub fn visit<R>(&self, handlers: Handlers<'_, R>) -> Result<R> {
        handlers
            .exhaustive()
            .map_err(NodeError::from)?
            .dispatch(self)
    }
}
