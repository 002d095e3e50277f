//! Derive macro implementation for layercfg

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::FieldAttrs;

/// `Record` derive macro
///
/// Generates the field table and visitor walks that let `layercfg` populate
/// the struct, plus the `FieldValue` and `Target` glue needed to nest it in
/// other records and hand it to the entry points.
///
/// # Supported Attributes
///
/// **Field-level** (`#[conf(...)]`):
/// - `env = "NAME"`: environment variable (and dotenv) key
/// - `flag = "name"`: long command-line option
/// - `s_flag = "n"`: single-character short alias
/// - `description = "..."`: help text for the command-line option
/// - `default = value`: literal applied before any source
/// - `json = "key"`, `yaml = "key"`, `toml = "key"`: document keys
/// - `skip`: leave the field out entirely
///
/// Any other `key = literal` pair is kept as an annotation and can be
/// queried with `layercfg::scan`.
///
/// # Example
///
/// See the `layercfg` crate documentation for usage examples.
#[proc_macro_derive(Record, attributes(conf))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Record only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Record only supports structs",
            ));
        }
    };

    let mut table = Vec::new();
    let mut members = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        if attrs.skip {
            continue;
        }

        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let name = ident.unraw().to_string();
        let pairs = attrs.annotations.iter().map(|(key, value)| {
            quote! { (#key, #value) }
        });

        table.push(quote! {
            ::layercfg::Field::new(#name, &[#(#pairs),*])
        });
        members.push(ident);
    }

    let indices = 0..members.len();
    let indices_mut = 0..members.len();

    Ok(quote! {
        impl ::layercfg::Record for #struct_name {
            fn fields(&self) -> &'static [::layercfg::Field] {
                const FIELDS: &[::layercfg::Field] = &[#(#table),*];
                FIELDS
            }

            #[allow(unused_variables)]
            fn visit(
                &self,
                visitor: &mut dyn FnMut(&'static ::layercfg::Field, ::layercfg::Node<'_>),
            ) {
                let fields = ::layercfg::Record::fields(self);
                #(
                    visitor(&fields[#indices], ::layercfg::FieldValue::node(&self.#members));
                )*
            }

            #[allow(unused_variables)]
            fn visit_mut(
                &mut self,
                visitor: &mut dyn FnMut(&'static ::layercfg::Field, ::layercfg::Slot<'_>),
            ) {
                let fields = ::layercfg::Record::fields(self);
                #(
                    visitor(&fields[#indices_mut], ::layercfg::FieldValue::slot(&mut self.#members));
                )*
            }
        }

        impl ::layercfg::FieldValue for #struct_name {
            fn node(&self) -> ::layercfg::Node<'_> {
                ::layercfg::Node::Record(self)
            }

            fn slot(&mut self) -> ::layercfg::Slot<'_> {
                ::layercfg::Slot::Record(self)
            }
        }

        impl ::layercfg::Target for #struct_name {
            fn shape(&mut self) -> ::layercfg::Shape<'_> {
                ::layercfg::Shape::Value
            }
        }
    })
}
