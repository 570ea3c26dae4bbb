//! Derive macros for node-core.
//!
//! - `#[derive(Record)]` - field descriptor table plus `ToNode`/`FromNode` for structs
//! - `#[derive(NodeEnum)]` - ordinal/name tables plus `ToNode`/`FromNode`/`ByName`/`MapKey`
//!   for fieldless enums
//!
//! Generated code refers to `::node_core`, so the deriving crate must depend on
//! node-core under that name.

use proc_macro::TokenStream;

mod attrs;
mod node_enum;
mod record;

/// Derive the structural serializer for a struct.
///
/// # Container attributes
///
/// - `#[node(as_array)]` - serialize positionally as a Sequence
///
/// # Field attributes
///
/// - `#[node(rename = "...")]` - output key override
/// - `#[node(by_name)]` - enum field serialized as its variant name
/// - `#[node(as_array)]` - field serialized with the forced-array policy
/// - `#[node(ignore)]` - excluded in both directions (type must be `Default`)
/// - `#[node(optional)]` - may be absent on input (type must be `Default`)
/// - `#[node(masked)]` - excluded from serialization only
/// - `#[node(as_string)]` - serialized through `Display`, not deserialized
/// - `#[node(with = "path")]` - `path::to_node` / `path::from_node` pair
///
/// # Example
///
/// ```ignore
/// #[derive(Record)]
/// struct Account {
///     id: u64,
///     #[node(masked)]
///     secret: String,
///     #[node(rename = "type")]
///     kind: AccountKind,
/// }
/// ```
#[proc_macro_derive(Record, attributes(node))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record_impl(input)
}

/// Derive the ordinal/name representation for a fieldless enum.
///
/// # Attributes
///
/// - `#[node(by_name)]` on the enum - serialize as the variant name by default
/// - `#[node(rename = "...")]` on a variant - symbol override
#[proc_macro_derive(NodeEnum, attributes(node))]
pub fn derive_node_enum(input: TokenStream) -> TokenStream {
    node_enum::derive_node_enum_impl(input)
}
