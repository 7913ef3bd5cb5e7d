//! Code generation for `#[derive(Record)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_record_attrs, FieldKind};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut nested_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut key_impl: Option<TokenStream> = None;

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let attrs = parse_record_attrs(&field.attrs)?;

        if attrs.skip {
            continue;
        }

        if attrs.key {
            if key_impl.is_some() {
                return Err(Error::new(field.span(), "only one field can be marked `key`"));
            }
            let key_ty = &field.ty;
            key_impl = Some(quote! {
                impl #impl_generics ::listkit::Keyed for #struct_name #ty_generics #where_clause {
                    type Key = #key_ty;

                    fn key(&self) -> Self::Key {
                        ::core::clone::Clone::clone(&self.#field_name)
                    }
                }
            });
        }

        let kind = match attrs.kind {
            Some(kind) => kind,
            None => continue,
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name constant for descriptors.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = match kind {
            FieldKind::Text => quote! { ::listkit::FieldText::text_value(&self.#field_name) },
            FieldKind::Number => quote! { ::listkit::FieldNumber::number_value(&self.#field_name) },
            FieldKind::Date => {
                quote! { ::listkit::FieldTimestamp::timestamp_value(&self.#field_name) }
            }
            FieldKind::Enum => quote! {
                ::listkit::Value::Enum(::listkit::FieldEnum::discriminant(&self.#field_name))
            },
            FieldKind::Bool => quote! { ::listkit::FieldBool::bool_value(&self.#field_name) },
            FieldKind::Nested => {
                let prefix = format!("{}.", query_name);
                nested_matches.push(quote! {
                    f if f.starts_with(#prefix) => {
                        ::listkit::Record::field_value(&self.#field_name, &f[#prefix.len()..])
                    }
                });
                continue;
            }
        };

        field_matches.push(quote! {
            #query_name => #value_expr,
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::listkit::Record for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::listkit::Value<'_> {
                match field {
                    #(#field_matches)*
                    #(#nested_matches)*
                    _ => ::listkit::Value::None,
                }
            }
        }

        #key_impl
    };

    Ok(expanded)
}

/// Converts a query name to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
