//! Parsing of `#[record(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, Meta, Result, Token,
};

const EXPECTED_KINDS: &str = "text, number, date, Enum, bool or nested";

/// How a field is exposed to queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Searchable text: `#[record(text)]`
    Text,
    /// Numeric: `#[record(number)]`
    Number,
    /// Point in time: `#[record(date)]`
    Date,
    /// Enum compared by discriminant: `#[record(Enum)]`
    Enum,
    /// Boolean: `#[record(bool)]`
    Bool,
    /// A struct implementing `Record`, reached with `field.sub`:
    /// `#[record(nested)]`
    Nested,
}

impl FieldKind {
    fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "text" | "Text" | "string" | "String" => Ok(FieldKind::Text),
            "number" | "Number" => Ok(FieldKind::Number),
            "date" | "Date" | "timestamp" | "Timestamp" => Ok(FieldKind::Date),
            "enum" | "Enum" | "enumeration" => Ok(FieldKind::Enum),
            "bool" | "Bool" | "boolean" => Ok(FieldKind::Bool),
            "nested" | "Nested" => Ok(FieldKind::Nested),
            other => Err(Error::new(
                span,
                format!("unknown record field kind: '{}'. Expected one of: {}", other, EXPECTED_KINDS),
            )),
        }
    }

    fn from_ident(ident: &Ident) -> Result<Self> {
        FieldKind::parse(&ident.to_string(), ident.span())
    }
}

/// Field-level attributes from `#[record(...)]`.
#[derive(Debug, Clone, Default)]
pub struct RecordAttr {
    /// How the field is exposed, if at all.
    pub kind: Option<FieldKind>,
    /// The field is the record's identifier.
    pub key: bool,
    /// Exclude the field.
    pub skip: bool,
    /// Query name, when different from the field name.
    pub rename: Option<String>,
}

fn string_literal(expr: &Expr, what: &str) -> Result<syn::LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(other.span(), format!("{} must be a string literal", what))),
    }
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("key") => attr.key = true,
                Meta::Path(p) => {
                    let ident = p.get_ident().ok_or_else(|| {
                        Error::new(p.span(), format!("expected {}, key or skip", EXPECTED_KINDS))
                    })?;
                    attr.set_kind(FieldKind::from_ident(ident)?, ident.span())?;
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_literal(&nv.value, "rename")?.value());
                }
                // ty = "enum" for kinds that are keywords
                Meta::NameValue(nv) if nv.path.is_ident("ty") => {
                    let lit = string_literal(&nv.value, "ty")?;
                    attr.set_kind(FieldKind::parse(&lit.value(), lit.span())?, lit.span())?;
                }
                Meta::NameValue(nv) => {
                    return Err(Error::new(
                        nv.path.span(),
                        "unknown attribute. Expected: rename or ty",
                    ));
                }
                Meta::List(list) => {
                    return Err(Error::new(
                        list.span(),
                        "unexpected list in record attribute",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

impl RecordAttr {
    fn set_kind(&mut self, kind: FieldKind, span: Span) -> Result<()> {
        if self.kind.is_some() {
            return Err(Error::new(span, "a field can only have one kind"));
        }
        self.kind = Some(kind);
        Ok(())
    }
}

/// Extracts `#[record(...)]` from a field's attributes.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<RecordAttr>();
        }
    }
    Ok(RecordAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tokens: &str) -> Result<RecordAttr> {
        syn::parse_str::<RecordAttr>(tokens)
    }

    #[test]
    fn kinds() {
        assert_eq!(parse("text").unwrap().kind, Some(FieldKind::Text));
        assert_eq!(parse("String").unwrap().kind, Some(FieldKind::Text));
        assert_eq!(parse("number").unwrap().kind, Some(FieldKind::Number));
        assert_eq!(parse("date").unwrap().kind, Some(FieldKind::Date));
        assert_eq!(parse("Enum").unwrap().kind, Some(FieldKind::Enum));
        assert_eq!(parse("enumeration").unwrap().kind, Some(FieldKind::Enum));
        assert_eq!(parse("bool").unwrap().kind, Some(FieldKind::Bool));
        assert_eq!(parse("nested").unwrap().kind, Some(FieldKind::Nested));
    }

    #[test]
    fn enum_keyword_via_ty() {
        let attr = parse(r#"ty = "enum", rename = "status""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Enum));
        assert_eq!(attr.rename.as_deref(), Some("status"));
    }

    #[test]
    fn key_combines_with_kind() {
        let attr = parse("number, key").unwrap();
        assert!(attr.key);
        assert_eq!(attr.kind, Some(FieldKind::Number));

        let key_only = parse("key").unwrap();
        assert!(key_only.key);
        assert_eq!(key_only.kind, None);
    }

    #[test]
    fn skip() {
        let attr = parse("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn errors() {
        let err = parse("colour").unwrap_err();
        assert!(err.to_string().contains("unknown record field kind"));

        assert!(parse("text, number").is_err());
        assert!(parse("rename = 3").is_err());
        assert!(parse(r#"label = "x""#).is_err());
    }
}
