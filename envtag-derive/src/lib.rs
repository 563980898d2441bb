//! Derive macro implementation for envtag

use proc_macro::TokenStream;
use proc_macro2::TokenTree;
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, Ident};

mod attrs;

use attrs::FieldAttrs;

/// `Unmarshal` derive macro
///
/// Implements `envtag::Unmarshal` for a struct with named fields: a static
/// `SCHEMA` describing each field, and a `populate` method visiting the fields
/// in declaration order.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[env("KEY|ALT,default=value,required,file,expand")]`: keys and options
/// - `#[env("PREFIX")]` on a nested struct: look its fields up under `PREFIX_`
/// - `#[env(skip)]`: leave the field alone
///
/// Fields without an attribute are still visited, so nested structs are
/// populated under the parent's prefix while scalars keep their value.
///
/// Generic structs get an `envtag::Field` bound for every visited field whose
/// type mentions a type parameter.
///
/// # Example
///
/// See the `envtag` crate documentation for usage examples.
#[proc_macro_derive(Unmarshal, attributes(env))]
pub fn derive_unmarshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let type_params: Vec<&Ident> = input.generics.type_params().map(|p| &p.ident).collect();
    let mut generics = input.generics.clone();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Unmarshal only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Unmarshal only supports structs",
            ));
        }
    };

    let mut schema_entries = Vec::new();
    let mut populate_calls = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        if attrs.skip {
            continue;
        }

        // Named fields always have an ident
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ident_str = ident.unraw().to_string();
        let field_type = &field.ty;
        let tag = attrs.tag;

        if mentions_any(field_type.to_token_stream(), &type_params) {
            generics
                .make_where_clause()
                .predicates
                .push(parse_quote!(#field_type: ::envtag::Field));
        }

        schema_entries.push(quote! {
            ::envtag::FieldSchema {
                ident: #ident_str,
                tag: #tag,
                nested: <#field_type as ::envtag::Field>::NESTED,
            }
        });

        populate_calls.push(quote! {
            ::envtag::Field::populate_field(&mut self.#ident, walker, prefix, #tag)?;
        });
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::envtag::Unmarshal for #struct_name #ty_generics #where_clause {
            const SCHEMA: &'static [::envtag::FieldSchema] = &[
                #(#schema_entries),*
            ];

            #[allow(unused_variables)]
            fn populate(
                &mut self,
                walker: &::envtag::Walker<'_>,
                prefix: &str,
            ) -> ::core::result::Result<(), ::envtag::Error> {
                #(#populate_calls)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn mentions_any(tokens: proc_macro2::TokenStream, idents: &[&Ident]) -> bool {
    tokens.into_iter().any(|tt| match tt {
        TokenTree::Ident(ident) => idents.iter().any(|p| **p == ident),
        TokenTree::Group(group) => mentions_any(group.stream(), idents),
        _ => false,
    })
}
