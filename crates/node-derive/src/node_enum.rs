//! Implementation of #[derive(NodeEnum)]

use crate::attrs::{parse_container, parse_variant};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

pub fn derive_node_enum_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let container = parse_container(&input.attrs)?;
    if container.as_array {
        return Err(syn::Error::new_spanned(
            name,
            "as_array applies to structs and fields, not enums",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "NodeEnum cannot be derived for generic enums",
        ));
    }

    let data = match &input.data {
        Data::Enum(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "NodeEnum only works on enums",
            ))
        }
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "NodeEnum needs at least one variant",
        ));
    }

    let mut idents = Vec::new();
    let mut names = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "NodeEnum variants cannot carry data",
            ));
        }
        let symbol = parse_variant(&variant.attrs)?.unwrap_or_else(|| variant.ident.to_string());
        idents.push(&variant.ident);
        names.push(symbol);
    }

    let name_str = name.to_string();
    let by_name = container.by_name;

    Ok(quote! {
        impl ::node_core::NodeEnum for #name {
            const NAME: &'static str = #name_str;
            const VARIANTS: &'static [Self] = &[#(Self::#idents),*];
            const BY_NAME: bool = #by_name;

            fn ordinal(&self) -> i64 {
                match self {
                    #(Self::#idents => Self::#idents as i64,)*
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }
        }

        impl ::node_core::ToNode for #name {
            fn to_node(&self) -> ::node_core::error::Result<::node_core::Node> {
                ::std::result::Result::Ok(::node_core::enums::enum_to_node(self))
            }
        }

        impl ::node_core::FromNode for #name {
            fn from_node(node: &::node_core::Node) -> ::node_core::error::Result<Self> {
                ::node_core::enums::enum_from_node(node)
            }
        }

        impl ::node_core::ByName for #name {
            fn to_name_node(&self) -> ::node_core::error::Result<::node_core::Node> {
                ::std::result::Result::Ok(::node_core::Node::Text(
                    ::std::string::ToString::to_string(::node_core::NodeEnum::name(self)),
                ))
            }

            fn from_name_node(node: &::node_core::Node) -> ::node_core::error::Result<Self> {
                ::node_core::enums::enum_from_name(node)
            }
        }

        impl ::node_core::MapKey for #name {
            fn to_key(&self) -> ::std::string::String {
                ::node_core::enums::enum_to_key(self)
            }

            fn from_key(key: &str) -> ::node_core::error::Result<Self> {
                ::node_core::enums::enum_from_key(key)
            }
        }
    })
}
