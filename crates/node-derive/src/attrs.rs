//! Parsing of `#[node(...)]` attributes.

use syn::{Attribute, LitStr, Path};

#[derive(Default)]
pub struct ContainerAttrs {
    pub as_array: bool,
    pub by_name: bool,
}

#[derive(Default)]
pub struct FieldAttrs {
    pub rename: Option<String>,
    pub by_name: bool,
    pub as_array: bool,
    pub ignore: bool,
    pub optional: bool,
    pub masked: bool,
    pub as_string: bool,
    pub with: Option<Path>,
}

impl FieldAttrs {
    /// How many of the mutually exclusive representation overrides are set.
    fn representations(&self) -> usize {
        [self.by_name, self.as_array, self.as_string, self.with.is_some()]
            .iter()
            .filter(|set| **set)
            .count()
    }
}

pub fn parse_container(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("node") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("as_array") {
                out.as_array = true;
            } else if meta.path.is_ident("by_name") {
                out.by_name = true;
            } else {
                return Err(meta.error("unknown container attribute"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

pub fn parse_field(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("node") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                out.rename = Some(value.value());
            } else if meta.path.is_ident("with") {
                let value: LitStr = meta.value()?.parse()?;
                out.with = Some(value.parse()?);
            } else if meta.path.is_ident("by_name") {
                out.by_name = true;
            } else if meta.path.is_ident("as_array") {
                out.as_array = true;
            } else if meta.path.is_ident("ignore") {
                out.ignore = true;
            } else if meta.path.is_ident("optional") {
                out.optional = true;
            } else if meta.path.is_ident("masked") {
                out.masked = true;
            } else if meta.path.is_ident("as_string") {
                out.as_string = true;
            } else {
                return Err(meta.error("unknown field attribute"));
            }
            Ok(())
        })?;

        if out.representations() > 1 {
            return Err(syn::Error::new_spanned(
                attr,
                "by_name, as_array, as_string and with are mutually exclusive",
            ));
        }
    }
    Ok(out)
}

/// Variant-level `#[node(rename = "...")]`.
pub fn parse_variant(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs {
        if !attr.path().is_ident("node") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unknown variant attribute"))
            }
        })?;
    }
    Ok(rename)
}
