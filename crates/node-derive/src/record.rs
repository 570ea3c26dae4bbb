//! Implementation of #[derive(Record)]

use crate::attrs::{parse_container, parse_field, FieldAttrs};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, Generics, Index, Member, Type};

struct Field {
    member: Member,
    ty: Type,
    ident: String,
    attrs: FieldAttrs,
}

pub fn derive_record_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let container = parse_container(&input.attrs)?;
    if container.by_name {
        return Err(syn::Error::new_spanned(
            name,
            "by_name applies to enums; use it on a field or derive NodeEnum",
        ));
    }

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Record only works on structs; derive NodeEnum for fieldless enums",
            ))
        }
    };

    let positional = !matches!(data.fields, Fields::Named(_));
    let fields = collect_fields(&data.fields)?;

    let descriptors = fields.iter().map(descriptor);
    let write_arms = fields.iter().enumerate().filter_map(|(i, f)| write_arm(i, f));
    let reads: Vec<TokenStream2> = fields.iter().enumerate().map(|(i, f)| read_expr(i, f)).collect();

    let construct = match &data.fields {
        Fields::Named(_) => {
            let members = fields.iter().map(|f| &f.member);
            quote! { Self { #(#members: #reads,)* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#reads,)*) },
        Fields::Unit => quote! { Self },
    };
    let fields_binding = if fields.is_empty() {
        quote! { let _ = source; }
    } else {
        quote! { let fields = <Self as ::node_core::Record>::fields(); }
    };

    let generics = bounded(&input.generics);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let name_str = name.to_string();
    let as_array = container.as_array;

    Ok(quote! {
        impl #impl_generics ::node_core::Record for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_str;
            const AS_ARRAY: bool = #as_array;
            const POSITIONAL: bool = #positional;

            fn fields() -> &'static [::node_core::FieldDescriptor] {
                const FIELDS: &[::node_core::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }

            #[allow(unused_variables)]
            fn write_field(
                &self,
                index: usize,
                layout: ::node_core::record::Layout,
                out: &mut ::std::vec::Vec<::node_core::Node>,
            ) -> ::node_core::error::Result<()> {
                match index {
                    #(#write_arms)*
                    _ => {}
                }
                ::std::result::Result::Ok(())
            }

            fn read_fields(
                source: &mut ::node_core::record::FieldSource<'_>,
            ) -> ::node_core::error::Result<Self> {
                #fields_binding
                ::std::result::Result::Ok(#construct)
            }
        }

        impl #impl_generics ::node_core::ToNode for #name #ty_generics #where_clause {
            fn to_node(&self) -> ::node_core::error::Result<::node_core::Node> {
                ::node_core::record::record_to_node(self, false)
            }

            fn to_node_array(&self) -> ::node_core::error::Result<::node_core::Node> {
                ::node_core::record::record_to_node(self, true)
            }
        }

        impl #impl_generics ::node_core::FromNode for #name #ty_generics #where_clause {
            fn from_node(node: &::node_core::Node) -> ::node_core::error::Result<Self> {
                ::node_core::record::record_from_node(node, false)
            }

            fn from_node_array(node: &::node_core::Node) -> ::node_core::error::Result<Self> {
                ::node_core::record::record_from_node(node, true)
            }
        }
    })
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<Field>> {
    let mut out = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        let (member, ident) = match &field.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.unraw().to_string()),
            None => (Member::Unnamed(Index::from(i)), i.to_string()),
        };
        out.push(Field {
            member,
            ty: field.ty.clone(),
            ident,
            attrs: parse_field(&field.attrs)?,
        });
    }
    Ok(out)
}

/// Every type parameter must convert both ways.
fn bounded(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param
            .bounds
            .push(parse_quote!(::node_core::ToNode));
        param
            .bounds
            .push(parse_quote!(::node_core::FromNode));
    }
    generics
}

/// Output name: rename, else the identifier with one trailing underscore stripped.
fn output_name(field: &Field) -> String {
    match &field.attrs.rename {
        Some(rename) => rename.clone(),
        None => field
            .ident
            .strip_suffix('_')
            .unwrap_or(&field.ident)
            .to_string(),
    }
}

/// `Vec < u8 >` → `Vec<u8>`
fn type_name(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace(" :: ", "::")
        .replace("& ", "&")
}

fn descriptor(field: &Field) -> TokenStream2 {
    let ident = &field.ident;
    let name = output_name(field);
    let type_name = type_name(&field.ty);
    let a = &field.attrs;
    let rename = match &a.rename {
        Some(r) => quote! { ::std::option::Option::Some(#r) },
        None => quote! { ::std::option::Option::None },
    };
    let (by_name, as_array, ignore, optional, masked, as_string) =
        (a.by_name, a.as_array, a.ignore, a.optional, a.masked, a.as_string);
    let custom = a.with.is_some();

    quote! {
        ::node_core::FieldDescriptor {
            ident: #ident,
            name: #name,
            type_name: #type_name,
            policy: ::node_core::FieldPolicy {
                rename: #rename,
                by_name: #by_name,
                as_array: #as_array,
                ignore: #ignore,
                optional: #optional,
                masked: #masked,
                as_string: #as_string,
                custom: #custom,
            },
        }
    }
}

/// Match arm writing field `index`; `None` for fields that never serialize.
fn write_arm(index: usize, field: &Field) -> Option<TokenStream2> {
    let a = &field.attrs;
    if a.ignore || a.masked {
        return None;
    }
    let member = &field.member;
    let body = if a.as_string {
        quote! {
            out.push(::node_core::Node::Text(::std::string::ToString::to_string(&self.#member)))
        }
    } else if a.by_name {
        quote! { out.push(::node_core::ByName::to_name_node(&self.#member)?) }
    } else if a.as_array {
        quote! { out.push(::node_core::ToNode::to_node_array(&self.#member)?) }
    } else if let Some(path) = &a.with {
        quote! { out.push(#path::to_node(&self.#member)?) }
    } else {
        quote! { ::node_core::record::write_plain(&self.#member, layout, out)? }
    };
    Some(quote! { #index => { #body; } })
}

/// Expression producing field `index` inside `read_fields`.
fn read_expr(index: usize, field: &Field) -> TokenStream2 {
    let a = &field.attrs;
    let ty = &field.ty;
    if a.ignore || a.as_string {
        return quote! { source.skip::<#ty>(&fields[#index]) };
    }

    let reader = if a.by_name {
        Some(quote! { <#ty as ::node_core::ByName>::from_name_node })
    } else if a.as_array {
        Some(quote! { <#ty as ::node_core::FromNode>::from_node_array })
    } else {
        a.with.as_ref().map(|path| quote! { #path::from_node })
    };

    match (reader, a.optional) {
        (Some(reader), true) => quote! { source.read_optional_with::<#ty>(&fields[#index], #reader)? },
        (Some(reader), false) => quote! { source.read_with::<#ty>(&fields[#index], #reader)? },
        (None, true) => quote! { source.read_optional::<#ty>(&fields[#index])? },
        (None, false) => quote! { source.read::<#ty>(&fields[#index])? },
    }
}
