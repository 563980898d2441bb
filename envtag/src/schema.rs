//! Static description of annotated structs
//!
//! The derive macro emits one [`FieldSchema`] per non-skipped field. Nested
//! structs point at their own schema, so the whole tree is known at compile
//! time without walking a value.

use crate::tag::{nested_prefix, parse_tag};
use crate::walker::Unmarshal;

/// Metadata for one field of an [`Unmarshal`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Rust field name.
    pub ident: &'static str,
    /// Raw annotation string (empty when the field has none).
    pub tag: &'static str,
    /// Schema of the field's type when it is itself an [`Unmarshal`] struct.
    pub nested: Option<&'static [FieldSchema]>,
}

/// One variable read by a type, as listed by [`variables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Dotted Rust path of the field, e.g. `database.host`.
    pub path: String,
    /// Candidate keys with prefixes applied, in lookup order.
    pub keys: Vec<String>,
    pub fallback: String,
    pub required: bool,
    pub file: bool,
    pub expand: bool,
}

/// List every variable `T` reads, depth-first in declaration order.
///
/// Untagged scalar fields are left out, as they are never populated.
///
/// ```rust
/// use envtag::Unmarshal;
///
/// #[derive(Default, Unmarshal)]
/// struct Database {
///     #[env("HOST,default=localhost")]
///     host: String,
/// }
///
/// #[derive(Default, Unmarshal)]
/// struct Config {
///     #[env("DB")]
///     database: Database,
/// }
///
/// let vars = envtag::variables::<Config>();
/// assert_eq!(vars[0].path, "database.host");
/// assert_eq!(vars[0].keys, ["DB_HOST"]);
/// assert_eq!(vars[0].fallback, "localhost");
/// ```
pub fn variables<T: Unmarshal>() -> Vec<Variable> {
    let mut out = Vec::new();
    collect(T::SCHEMA, "", "", &mut out);
    out
}

fn collect(schema: &[FieldSchema], prefix: &str, path: &str, out: &mut Vec<Variable>) {
    for field in schema {
        let field_path = if path.is_empty() {
            field.ident.to_string()
        } else {
            format!("{path}.{}", field.ident)
        };

        if let Some(nested) = field.nested {
            collect(nested, &nested_prefix(prefix, field.tag), &field_path, out);
            continue;
        }

        if field.tag.is_empty() {
            continue;
        }

        let spec = parse_tag(field.tag);
        out.push(Variable {
            path: field_path,
            keys: spec.keys.iter().map(|k| format!("{prefix}{k}")).collect(),
            fallback: spec.fallback,
            required: spec.required,
            file: spec.file,
            expand: spec.expand,
        });
    }
}

/// Fallback of the first field, searching nested structs depth-first, whose
/// primary key is `name`. Keys are compared without prefixes.
pub(crate) fn fallback_for(schema: &[FieldSchema], name: &str) -> Option<String> {
    schema.iter().find_map(|field| match field.nested {
        Some(nested) => fallback_for(nested, name),
        None if field.tag.is_empty() => None,
        None => {
            let spec = parse_tag(field.tag);
            (spec.primary_key() == name).then_some(spec.fallback)
        }
    })
}
