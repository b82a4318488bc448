use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, LitStr, Type};

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    // Extract #[entity(collection = "...")] from struct-level attributes
    let collection = extract_collection(&input);

    // Resolve the single field marked with #[entity(key)]
    let (key_field, key_type) = match extract_key_field(&input) {
        Ok(pair) => pair,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl crud_rust::Entity for #name {
            type Key = #key_type;

            const COLLECTION: &'static str = #collection;

            fn key(&self) -> Self::Key {
                self.#key_field
            }

            fn set_key(&mut self, key: Self::Key) {
                self.#key_field = key;
            }
        }
    };

    TokenStream::from(expanded)
}

fn extract_collection(input: &DeriveInput) -> String {
    for attr in &input.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        let mut collection = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                collection = Some(value.value());
            }
            Ok(())
        });

        if let Some(c) = collection {
            return c;
        }
    }

    // Default: snake_case struct name + "s"
    let name = input.ident.to_string();
    format!("{}s", to_snake_case(&name))
}

fn extract_key_field(input: &DeriveInput) -> Result<(syn::Ident, Type), Error> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    input,
                    "Entity derive: only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                input,
                "Entity derive: only structs are supported",
            ))
        }
    };

    let mut key_fields = Vec::new();
    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }
            let mut is_key = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    is_key = true;
                }
                Ok(())
            });
            if is_key {
                key_fields.push((field.ident.clone().unwrap(), field.ty.clone()));
            }
        }
    }

    match key_fields.len() {
        1 => Ok(key_fields.pop().unwrap()),
        0 => Err(Error::new_spanned(
            input,
            format!(
                "the type {} does not have a field with the #[entity(key)] attribute",
                input.ident
            ),
        )),
        _ => Err(Error::new_spanned(
            input,
            "multiple key fields are not supported",
        )),
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(ch.to_lowercase().next().unwrap());
        } else {
            result.push(ch);
        }
    }
    result
}
