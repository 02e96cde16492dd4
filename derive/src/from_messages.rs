use std::collections::{BTreeMap, btree_map::Entry};

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, LitInt, Result, Type};

pub(crate) fn expand_from_messages(input: &DeriveInput) -> Result<TokenStream> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "`FromMessages` requires a struct with named fields.",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "`FromMessages` can only be derived for structs.",
            ));
        }
    };

    let mut routes = BTreeMap::new();
    for field in named {
        let Some(route) = Route::from_field(field)? else {
            continue;
        };

        match routes.entry(route.global) {
            Entry::Occupied(_) => {
                return Err(Error::new(
                    route.span,
                    format!("Message {} is routed to more than one field.", route.global),
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(route);
            }
        }
    }

    let arms = routes.values().map(Route::arm);
    let receiver = &input.ident;

    Ok(quote! {
        impl ::cassette::avec::FromMessages for #receiver {
            fn add_message(
                &mut self,
                global: u16,
            ) -> ::core::option::Option<&mut dyn ::cassette::avec::FromMessage> {
                match global {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    }
    .into())
}

/// A field receiving every message with one global number.
struct Route {
    global: u16,
    span: Span,
    field: Ident,
    target: Target,
}

/// How a field holds the messages routed to it.
enum Target {
    /// `Option<T>`: each message replaces the previous one.
    Latest,
    /// `Vec<T>`: each message is appended.
    Every,
}

impl Route {
    fn from_field(field: &Field) -> Result<Option<Self>> {
        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("message")) else {
            return Ok(None);
        };

        let number = attr.parse_args::<LitInt>()?;
        let field_name = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Message fields must be named."))?;

        Ok(Some(Self {
            global: number.base10_parse()?,
            span: number.span(),
            field: field_name,
            target: Target::of(&field.ty)?,
        }))
    }

    fn arm(&self) -> TokenStream2 {
        let Self { global, field, .. } = self;

        let receiver = match self.target {
            Target::Latest => quote! {
                ::core::option::Option::Some(self.#field.insert(::core::default::Default::default()))
            },
            Target::Every => quote! {{
                self.#field.push(::core::default::Default::default());
                self.#field.last_mut().map(|m| m as _)
            }},
        };

        quote! { #global => #receiver, }
    }
}

impl Target {
    fn of(ty: &Type) -> Result<Self> {
        let container = match ty {
            Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
            _ => None,
        };

        match container.map(|segment| segment.ident.to_string()).as_deref() {
            Some("Option") => Ok(Target::Latest),
            Some("Vec") => Ok(Target::Every),
            _ => Err(Error::new_spanned(
                ty,
                "Message fields must be `Option<T>` or `Vec<T>`.",
            )),
        }
    }
}
