//! Field descriptors and the generic record walk.
//!
//! `#[derive(Record)]` emits a static [`FieldDescriptor`] table plus two small
//! per-field hooks ([`Record::write_field`], [`Record::read_fields`]); the
//! layout decisions all live here.
//!
//! # Layouts
//!
//! - **Named** (default for structs with named fields): a Mapping from output
//!   name to value, for every field that is neither `ignore`d nor `masked`.
//! - **Positional** (`#[node(as_array)]`, or tuple structs with more than one
//!   field): a Sequence with one slot per serialized field in declaration order.
//!   Tuple-valued fields flatten into one slot per element. A `masked` field is
//!   written without a slot but still claims one when reading, so the value has
//!   to be put back before the sequence deserializes; an `as_string` field's
//!   slot is skipped on the way back.
//! - **Bare**: a tuple struct with exactly one field is its inner value; a unit
//!   struct is Nil.
//!
//! # Field names
//!
//! The output name is the `rename` override if present, otherwise the field
//! identifier with one trailing underscore stripped (`type_` → `type`).

use crate::de::{FromNode, Slots};
use crate::error::{DeserializationError, NodeError, Result};
use crate::node::{Mapping, Node};
use crate::ser::ToNode;

/// Per-field policy flags from `#[node(...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldPolicy {
    pub rename: Option<&'static str>,
    pub by_name: bool,
    pub as_array: bool,
    pub ignore: bool,
    pub optional: bool,
    pub masked: bool,
    pub as_string: bool,
    /// Field uses a `with = "path"` serialize/deserialize pair.
    pub custom: bool,
}

/// One member of a record, as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Identifier as declared (`0`, `1`, … for tuple structs).
    pub ident: &'static str,
    /// Key used in the Named layout.
    pub name: &'static str,
    /// Declared type, as written in source.
    pub type_name: &'static str,
    pub policy: FieldPolicy,
}

impl FieldDescriptor {
    /// Emitted by serialization.
    pub fn serializes(&self) -> bool {
        !self.policy.ignore && !self.policy.masked
    }

    /// Read back by deserialization.
    pub fn deserializes(&self) -> bool {
        !self.policy.ignore && !self.policy.as_string
    }

    /// Claims a slot when reading the Positional layout.
    pub fn has_slot(&self) -> bool {
        !self.policy.ignore
    }
}

/// Output name for a field identifier: one trailing underscore is stripped and
/// raw-identifier prefixes are dropped.
pub fn field_name(ident: &str) -> &str {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    ident.strip_suffix('_').unwrap_or(ident)
}

/// How a field is being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Exactly one node per field.
    Named,
    /// Fields may contribute several slots.
    Positional,
}

/// A struct whose fields the engine can walk.
pub trait Record: Sized {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Container-level `#[node(as_array)]`.
    const AS_ARRAY: bool;

    /// Tuple struct (fields have no names).
    const POSITIONAL: bool;

    fn fields() -> &'static [FieldDescriptor];

    /// Push the serialized form of field `index` onto `out`. Only called for
    /// fields that serialize.
    fn write_field(&self, index: usize, layout: Layout, out: &mut Vec<Node>) -> Result<()>;

    /// Build `Self` by pulling every field from `source` in declaration order.
    fn read_fields(source: &mut FieldSource<'_>) -> Result<Self>;
}

/// Helper used by derived `write_field` for fields without a policy override.
pub fn write_plain<T: ToNode + ?Sized>(value: &T, layout: Layout, out: &mut Vec<Node>) -> Result<()> {
    match layout {
        Layout::Named => out.push(value.to_node()?),
        Layout::Positional => value.flatten_into(out)?,
    }
    Ok(())
}

/// Tuple structs with at most one field are their inner value (Nil for unit
/// structs).
fn is_bare<R: Record>(force_array: bool) -> bool {
    R::POSITIONAL && R::fields().len() <= 1 && !force_array && !R::AS_ARRAY
}

/// Serialize a record. `force_array` applies the forced-array policy from the
/// enclosing field.
pub fn record_to_node<R: Record>(record: &R, force_array: bool) -> Result<Node> {
    let fields = R::fields();

    if is_bare::<R>(force_array) {
        let mut out = Vec::with_capacity(1);
        if fields.first().is_some_and(FieldDescriptor::serializes) {
            record.write_field(0, Layout::Named, &mut out)?;
        }
        return Ok(out.pop().unwrap_or(Node::Nil));
    }

    if R::POSITIONAL || R::AS_ARRAY || force_array {
        let mut slots = Vec::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if field.serializes() {
                record.write_field(index, Layout::Positional, &mut slots)?;
            }
        }
        return Ok(Node::Sequence(slots));
    }

    let mut map = Mapping::new();
    let mut out = Vec::with_capacity(1);
    for (index, field) in fields.iter().enumerate() {
        if !field.serializes() {
            continue;
        }
        record.write_field(index, Layout::Named, &mut out)?;
        if let Some(node) = out.pop() {
            map.insert(field.name.to_string(), node);
        }
    }
    Ok(Node::Mapping(map))
}

/// Deserialize a record. `force_array` expects the positional layout.
pub fn record_from_node<R: Record>(node: &Node, force_array: bool) -> Result<R> {
    if is_bare::<R>(force_array) {
        return R::read_fields(&mut FieldSource::Bare { node, target: R::NAME });
    }

    if R::POSITIONAL || R::AS_ARRAY || force_array {
        let mut source = FieldSource::Positional(Slots::new(node.as_sequence()?, R::NAME));
        let record = R::read_fields(&mut source)?;
        if let FieldSource::Positional(slots) = &source {
            if !slots.is_exhausted() {
                tracing::trace!(
                    target_type = R::NAME,
                    surplus = slots.remaining(),
                    "ignoring surplus sequence slots"
                );
            }
        }
        return Ok(record);
    }

    let map = node.as_mapping()?;
    let record = R::read_fields(&mut FieldSource::Named { map, target: R::NAME })?;
    for key in map.keys() {
        if !R::fields().iter().any(|f| f.name == key) {
            tracing::trace!(target_type = R::NAME, key = %key, "ignoring unknown key");
        }
    }
    Ok(record)
}

/// Where derived `read_fields` pulls field values from.
#[derive(Debug)]
pub enum FieldSource<'a> {
    Named {
        map: &'a Mapping,
        target: &'static str,
    },
    Positional(Slots<'a>),
    Bare {
        node: &'a Node,
        target: &'static str,
    },
}

/// Outcome of looking a field up.
enum Lookup<'a> {
    Present(&'a Node),
    Missing,
}

impl<'a> FieldSource<'a> {
    fn target(&self) -> &'static str {
        match self {
            FieldSource::Named { target, .. } | FieldSource::Bare { target, .. } => *target,
            FieldSource::Positional(slots) => slots.target(),
        }
    }

    fn missing(&self, field: &FieldDescriptor) -> NodeError {
        DeserializationError::MissingField {
            field: field.name,
            target: self.target(),
        }
        .into()
    }

    /// Find the single node for `field`, consuming a positional slot.
    fn lookup(&mut self, field: &FieldDescriptor) -> Lookup<'a> {
        match self {
            FieldSource::Named { map, .. } => {
                let map: &'a Mapping = *map;
                match map.get(field.name) {
                    Some(node) => Lookup::Present(node),
                    None => Lookup::Missing,
                }
            }
            FieldSource::Positional(slots) => match slots.take() {
                Ok(node) => Lookup::Present(node),
                Err(_) => Lookup::Missing,
            },
            FieldSource::Bare { node, .. } => Lookup::Present(*node),
        }
    }

    /// A required field through its own `FromNode` impl. A missing key or slot
    /// is a `MissingField` error whatever the field's type.
    pub fn read<T: FromNode>(&mut self, field: &FieldDescriptor) -> Result<T> {
        if let FieldSource::Positional(slots) = self {
            if !slots.is_exhausted() {
                return T::from_slots(slots);
            }
        }
        match self.lookup(field) {
            Lookup::Present(node) => T::from_node(node),
            Lookup::Missing => Err(self.missing(field)),
        }
    }

    /// An `optional` field: absent, or a Nil positional slot, yields
    /// `T::default()`.
    pub fn read_optional<T: FromNode + Default>(&mut self, field: &FieldDescriptor) -> Result<T> {
        if let FieldSource::Positional(slots) = self {
            match slots.peek() {
                None => return Ok(T::default()),
                Some(Node::Nil) => {
                    let _ = slots.take();
                    return Ok(T::default());
                }
                Some(_) => return T::from_slots(slots),
            }
        }
        match self.lookup(field) {
            Lookup::Present(node) => T::from_node(node),
            Lookup::Missing => Ok(T::default()),
        }
    }

    /// A required field read through a policy-specific function (by-name,
    /// forced-array, custom method).
    pub fn read_with<T>(
        &mut self,
        field: &FieldDescriptor,
        read: impl FnOnce(&Node) -> Result<T>,
    ) -> Result<T> {
        match self.lookup(field) {
            Lookup::Present(node) => read(node),
            Lookup::Missing => Err(self.missing(field)),
        }
    }

    pub fn read_optional_with<T: Default>(
        &mut self,
        field: &FieldDescriptor,
        read: impl FnOnce(&Node) -> Result<T>,
    ) -> Result<T> {
        match self.lookup(field) {
            Lookup::Present(Node::Nil) | Lookup::Missing => Ok(T::default()),
            Lookup::Present(node) => read(node),
        }
    }

    /// A field excluded from deserialization (`ignore`, `as_string`). Its
    /// positional slot, if it has one, is consumed.
    pub fn skip<T: Default>(&mut self, field: &FieldDescriptor) -> T {
        if let FieldSource::Positional(slots) = self {
            if field.has_slot() {
                let _ = slots.take();
            }
        }
        T::default()
    }
}
