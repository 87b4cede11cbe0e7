extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, Member, parse_macro_input};

/// Derives `async_validate::HostComponent`.
///
/// Exactly one field must be marked `#[host(value)]` (an `async_validate::TrackedValue`)
/// and exactly one `#[host(state)]` (an `async_validate::ValidationState`).
#[proc_macro_derive(HostComponent, attributes(host))]
pub fn host_component_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
            Fields::Unnamed(fields) => fields.unnamed.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "HostComponent can only be derived for structs",
            ));
        }
    };

    let mut value = None;
    let mut state = None;
    for (index, field) in fields.iter().enumerate() {
        for role in host_roles(field)? {
            let slot = match role.to_string().as_str() {
                "value" => &mut value,
                "state" => &mut state,
                other => {
                    return Err(syn::Error::new_spanned(
                        &role,
                        format!("Unknown host attribute: {other}; expected `value` or `state`"),
                    ));
                }
            };
            if slot.is_some() {
                return Err(syn::Error::new_spanned(
                    &role,
                    format!("Only one field can be marked #[host({role})]"),
                ));
            }
            *slot = Some(member(field, index));
        }
    }

    let value = value.ok_or_else(|| missing(name, "value"))?;
    let state = state.ok_or_else(|| missing(name, "state"))?;

    Ok(quote! {
        impl #impl_generics ::async_validate::HostComponent for #name #ty_generics #where_clause {
            fn internal_value(&self) -> ::async_validate::Value {
                ::async_validate::TrackedValue::get(&self.#value)
            }

            fn validation_state(&self) -> &::async_validate::ValidationState {
                &self.#state
            }
        }
    })
}

// --- Helper Functions for Attribute Parsing ---

/// Collects the roles named in a field's `#[host(...)]` attributes.
fn host_roles(field: &Field) -> syn::Result<Vec<Ident>> {
    let mut roles = Vec::new();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("host")) {
        attr.parse_nested_meta(|meta| {
            let ident = meta
                .path
                .get_ident()
                .cloned()
                .ok_or_else(|| meta.error("Expected `value` or `state`"))?;
            roles.push(ident);
            Ok(())
        })?;
    }
    Ok(roles)
}

fn member(field: &Field, index: usize) -> Member {
    match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(index.into()),
    }
}

fn missing(name: &Ident, role: &str) -> syn::Error {
    syn::Error::new(
        Span::call_site(),
        format!("HostComponent derive on `{name}` needs a field marked #[host({role})]"),
    )
}
