//! Attribute parsing for `#[env(...)]` annotations.
//!
//! A field carries at most one of:
//! - `#[env("KEY|ALT,default=x,required,file,expand")]`
//! - `#[env("")]`, an explicit empty tag (embedded struct)
//! - `#[env(skip)]`, excluded from population and from the schema

use syn::parse::ParseStream;
use syn::{Field, Ident, LitStr};

/// Parsed `#[env(...)]` attribute of a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Annotation string; empty when the field has no `#[env]` attribute.
    pub tag: String,

    /// Field is left out of population entirely.
    pub skip: bool,
}

enum Annotation {
    Tag(LitStr),
    Skip,
}

impl FieldAttrs {
    /// Extract the `#[env(...)]` attribute from a struct field.
    ///
    /// Other attributes are ignored so that other derives can process them.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();
        let mut seen = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }

            if seen {
                return Err(syn::Error::new_spanned(
                    attr,
                    "duplicate env attribute; combine keys and options in one tag",
                ));
            }
            seen = true;

            match attr.parse_args_with(parse_annotation)? {
                Annotation::Tag(lit) => {
                    let tag = lit.value();
                    validate_tag(&tag).map_err(|msg| syn::Error::new(lit.span(), msg))?;
                    attrs.tag = tag;
                }
                Annotation::Skip => attrs.skip = true,
            }
        }

        Ok(attrs)
    }
}

fn parse_annotation(input: ParseStream) -> syn::Result<Annotation> {
    let annotation = if input.peek(LitStr) {
        Annotation::Tag(input.parse()?)
    } else {
        let ident: Ident = input.parse()?;
        if ident != "skip" {
            return Err(syn::Error::new(
                ident.span(),
                "expected a tag string like \"KEY,default=value\" or `skip`",
            ));
        }
        Annotation::Skip
    };

    if !input.is_empty() {
        return Err(input.error("unexpected tokens after env annotation"));
    }
    Ok(annotation)
}

/// Reject tags the runtime would silently misread.
fn validate_tag(tag: &str) -> Result<(), &'static str> {
    let (keys, options) = match tag.split_once(',') {
        Some((keys, options)) => (keys, Some(options)),
        None => (tag, None),
    };

    if options.is_some() && keys.trim().is_empty() {
        return Err("env tag has options but no key");
    }
    if !keys.is_empty() && keys.split('|').any(|k| k.trim().is_empty()) {
        return Err("env tag has an empty key between `|` separators");
    }
    Ok(())
}
