//! Attribute parsing for `#[conf(...)]` annotations.
//!
//! Every `key = literal` pair inside `#[conf(...)]` becomes one annotation of
//! the field. Keys are Rust identifiers, so underscores stand in for the
//! dashes used by annotation names (`s_flag` is the `s-flag` annotation).

use syn::spanned::Spanned;
use syn::{Expr, ExprLit, ExprUnary, Field, Lit, UnOp};

/// Annotation holding the short command-line alias.
const SHORT_FLAG: &str = "s-flag";

/// Parsed `#[conf(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Annotation name/value pairs in declaration order.
    pub annotations: Vec<(String, String)>,

    /// Leave the field out of the generated field table.
    pub skip: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[conf(...)]` attributes from a struct field.
    ///
    /// Attributes with other paths are ignored so that serde and friends can
    /// live on the same field.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("conf") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                let Some(ident) = meta.path.get_ident() else {
                    return Err(meta.error("expected an annotation name"));
                };

                // skip
                if ident == "skip" {
                    if meta.input.peek(syn::Token![=]) {
                        return Err(meta.error("`skip` does not take a value"));
                    }
                    attrs.skip = true;
                    return Ok(());
                }

                // key = literal
                let key = ident.to_string().replace('_', "-");
                let expr: Expr = meta.value()?.parse()?;
                let value = literal_text(&expr)?;

                if key == SHORT_FLAG && value.chars().count() != 1 {
                    return Err(syn::Error::new(
                        expr.span(),
                        "s_flag must be exactly one character",
                    ));
                }

                match attrs.annotations.iter_mut().find(|(k, _)| *k == key) {
                    Some(existing) => existing.1 = value,
                    None => attrs.annotations.push((key, value)),
                }
                Ok(())
            })?;
        }

        if attrs.skip && !attrs.annotations.is_empty() {
            return Err(syn::Error::new_spanned(
                field,
                "skipped fields cannot carry annotations",
            ));
        }

        Ok(attrs)
    }
}

/// Render an annotation literal as the string the engine will see.
fn literal_text(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Str(s) => Ok(s.value()),
            Lit::Int(i) => Ok(i.base10_digits().to_string()),
            Lit::Float(f) => Ok(f.base10_digits().to_string()),
            Lit::Bool(b) => Ok(b.value.to_string()),
            other => Err(syn::Error::new(
                other.span(),
                "annotation values must be string, integer, float or bool literals",
            )),
        },
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit {
                lit: Lit::Int(_) | Lit::Float(_),
                ..
            }) => Ok(format!("-{}", literal_text(inner)?)),
            other => Err(syn::Error::new(
                other.span(),
                "only numeric literals can be negated",
            )),
        },
        other => Err(syn::Error::new(
            other.span(),
            "annotation values must be literals",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn annotation<'a>(attrs: &'a FieldAttrs, key: &str) -> Option<&'a str> {
        attrs
            .annotations
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_parse_string_annotations() {
        let field: Field = parse_quote! {
            #[conf(env = "HTTP_HOST", flag = "http-host", description = "HTTP host")]
            pub host: String
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(annotation(&attrs, "env"), Some("HTTP_HOST"));
        assert_eq!(annotation(&attrs, "flag"), Some("http-host"));
        assert_eq!(annotation(&attrs, "description"), Some("HTTP host"));
        assert!(!attrs.skip);
    }

    #[test]
    fn test_underscore_becomes_dash() {
        let field: Field = parse_quote! {
            #[conf(s_flag = "p")]
            pub port: u16
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(annotation(&attrs, "s-flag"), Some("p"));
    }

    #[test]
    fn test_parse_default_number() {
        let field: Field = parse_quote! {
            #[conf(default = 42)]
            pub workers: u32
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(annotation(&attrs, "default"), Some("42"));
    }

    #[test]
    fn test_parse_default_negative_number() {
        let field: Field = parse_quote! {
            #[conf(default = -42)]
            pub offset: i64
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(annotation(&attrs, "default"), Some("-42"));
    }

    #[test]
    fn test_parse_default_float_and_bool() {
        let field: Field = parse_quote! {
            #[conf(default = 64.64, json = "ratio")]
            #[conf(yaml = "ratio")]
            pub ratio: f64
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(annotation(&attrs, "default"), Some("64.64"));
        assert_eq!(annotation(&attrs, "json"), Some("ratio"));
        assert_eq!(annotation(&attrs, "yaml"), Some("ratio"));

        let field: Field = parse_quote! {
            #[conf(default = true)]
            pub debug: bool
        };
        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(annotation(&attrs, "default"), Some("true"));
    }

    #[test]
    fn test_later_annotation_replaces_earlier() {
        let field: Field = parse_quote! {
            #[conf(env = "FIRST")]
            #[conf(env = "SECOND")]
            pub name: String
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.annotations, vec![("env".to_string(), "SECOND".to_string())]);
    }

    #[test]
    fn test_parse_skip() {
        let field: Field = parse_quote! {
            #[conf(skip)]
            pub cache: Vec<String>
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(attrs.skip);
        assert!(attrs.annotations.is_empty());
    }

    #[test]
    fn test_foreign_attributes_ignored() {
        let field: Field = parse_quote! {
            #[serde(rename = "other")]
            pub name: String
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(attrs.annotations.is_empty());
    }

    #[test]
    fn test_reject_long_short_flag() {
        let field: Field = parse_quote! {
            #[conf(s_flag = "hh")]
            pub host: String
        };

        let err = FieldAttrs::from_field(&field).unwrap_err();
        assert!(err.to_string().contains("exactly one character"));
    }

    #[test]
    fn test_reject_skip_with_annotations() {
        let field: Field = parse_quote! {
            #[conf(skip, env = "CACHE")]
            pub cache: Vec<String>
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }

    #[test]
    fn test_reject_non_literal_value() {
        let field: Field = parse_quote! {
            #[conf(default = "x".to_string())]
            pub name: String
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }
}
