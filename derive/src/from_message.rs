use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, Expr, ExprClosure, Field, Fields, Ident, LitInt, Pat, Result, Token,
    Type,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_message(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new(
            input.span(),
            "`FromMessage` may only be derived on structs.",
        ));
    };

    let Fields::Named(fields) = &data.fields else {
        return Err(Error::new(
            input.span(),
            "`FromMessage` may only be derived on structs with named fields.",
        ));
    };

    let fields = fields
        .named
        .iter()
        .filter_map(|field| FieldMetadata::parse(field).transpose()) // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    let mut numbered = Vec::new();
    let mut time = None;
    let mut timestamp = None;

    for field in fields {
        match &field.attribute.identifier {
            FieldIdentifier::Number(number) => {
                let value = number.base10_parse::<u8>()?;

                if numbered.iter().any(|(v, _): &(u8, FieldMetadata)| *v == value) {
                    return Err(Error::new(
                        number.span(),
                        "Field identifiers must be unique.",
                    ));
                }

                numbered.push((value, field));
            }
            FieldIdentifier::Time => {
                if time.replace(field).is_some() {
                    return Err(Error::new(
                        Span::call_site(),
                        "Field identifiers must be unique.",
                    ));
                }
            }
            FieldIdentifier::Timestamp => {
                if timestamp.replace(field).is_some() {
                    return Err(Error::new(
                        Span::call_site(),
                        "Field identifiers must be unique.",
                    ));
                }
            }
        }
    }

    let specs = numbered.iter().map(|(number, field)| {
        let spec = field.attribute.spec();
        quote! { #number => ::core::option::Option::Some(#spec), }
    });

    let assignments = numbered
        .iter()
        .map(|(number, field)| {
            let assignment = field.assignment()?;
            Ok(quote! { #number => { #assignment } })
        })
        .collect::<Result<Vec<_>>>()?;

    let time_method = time
        .map(|field| {
            let assignment = field.assignment_of(quote!(offset))?;
            Ok::<_, Error>(quote! {
                fn add_time_offset(&mut self, offset: u8) {
                    #assignment;
                }
            })
        })
        .transpose()?;

    let timestamp_method = timestamp
        .map(|field| {
            let assignment = field.assignment_of(quote!(timestamp))?;
            Ok::<_, Error>(quote! {
                fn add_timestamp(&mut self, timestamp: u32) {
                    #assignment;
                }
            })
        })
        .transpose()?;

    let name = &input.ident;

    let expanded = quote! {
        impl ::cassette::avec::FromMessage for #name {
            fn field_spec(
                &self,
                field: u8,
            ) -> ::core::option::Option<::cassette::avec::FieldSpec> {
                match field {
                    #(#specs)*
                    _ => ::core::option::Option::None,
                }
            }

            fn add_field(
                &mut self,
                field: u8,
                slice: &::cassette::FieldSlice<'_>,
                strategy: ::cassette::DecodingStrategy,
            ) {
                match field {
                    #(#assignments)*
                    _ => {}
                }
            }

            #time_method
            #timestamp_method
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    ty: Type,
    attribute: FieldAttribute,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let Some(name) = field.ident.clone() else {
            return Err(Error::new_spanned(field, "Field must be named."));
        };

        let attribute: FieldAttribute = attr.meta.require_list()?.parse_args()?;

        if !matches!(attribute.identifier, FieldIdentifier::Number(_)) && attribute.has_options()
        {
            return Err(Error::new_spanned(
                attr,
                "`time` and `timestamp` do not take `scale`, `offset`, `base` or `accumulate`.",
            ));
        }

        Ok(Some(Self {
            name,
            ty: field.ty.clone(),
            attribute,
        }))
    }

    /// Parameters of the handler closure, if any.
    fn handler(&self) -> Result<Option<(&Pat, &Pat, &Expr)>> {
        let Some(handler) = &self.attribute.handler else {
            return Ok(None);
        };

        let mut inputs = handler.inputs.iter();

        let (Some(acc), Some(val), None) = (inputs.next(), inputs.next(), inputs.next()) else {
            return Err(Error::new_spanned(
                handler,
                "Handler closure must have two parameters.",
            ));
        };

        Ok(Some((acc, val, &handler.body)))
    }

    /// Decode a field slice into the struct field.
    fn assignment(&self) -> Result<TokenStream2> {
        let name = &self.name;

        let Some((acc, val, body)) = self.handler()? else {
            return Ok(quote! {
                ::cassette::avec::Slot::receive(&mut self.#name, slice, strategy)
            });
        };

        let Pat::Type(pat_type) = val else {
            return Err(Error::new_spanned(
                val,
                "Handler closure's second parameter must be annotated with the decoded type.",
            ));
        };

        let decoded = &pat_type.ty;
        let field_type = &self.ty;

        Ok(quote! {
            if let ::core::option::Option::Some(value) =
                <#decoded as ::cassette::FieldCodec>::decode(slice, strategy)
            {
                (|#acc: &mut #field_type, #val| #body)(
                    &mut self.#name,
                    ::cassette::Decoded::into_inner(value),
                )
            }
        })
    }

    /// Assign a header value to the struct field.
    fn assignment_of(&self, value: TokenStream2) -> Result<TokenStream2> {
        let name = &self.name;

        let Some((acc, val, body)) = self.handler()? else {
            return Ok(quote! {
                self.#name = ::core::option::Option::Some(#value)
            });
        };

        let field_type = &self.ty;

        Ok(quote! {
            (|#acc: &mut #field_type, #val| #body)(&mut self.#name, #value)
        })
    }
}

#[derive(Debug)]
enum FieldIdentifier {
    Number(LitInt),
    Time,
    Timestamp,
}

#[derive(Debug)]
struct FieldAttribute {
    identifier: FieldIdentifier,
    scale: Option<Expr>,
    offset: Option<Expr>,
    base: Option<Ident>,
    accumulate: bool,
    handler: Option<ExprClosure>,
}

impl FieldAttribute {
    fn has_options(&self) -> bool {
        self.scale.is_some() || self.offset.is_some() || self.base.is_some() || self.accumulate
    }

    /// The field specification expression.
    fn spec(&self) -> TokenStream2 {
        let mut spec = quote! { ::cassette::avec::FieldSpec::new() };

        if let Some(base) = &self.base {
            spec = quote! { #spec.with_base(::cassette::BaseType::#base) };
        }

        if self.scale.is_some() || self.offset.is_some() {
            let scale = self.scale.as_ref().map_or(quote!(1), |s| quote!(#s));
            let offset = self.offset.as_ref().map_or(quote!(0), |o| quote!(#o));
            spec = quote! { #spec.with_resolution((#scale) as f64, (#offset) as f64) };
        }

        if self.accumulate {
            spec = quote! { #spec.accumulated() };
        }

        spec
    }
}

/// The variant of a base type name.
fn base_variant(ident: &Ident) -> Result<Ident> {
    let variant = match ident.to_string().as_str() {
        "enum" => "Enum",
        "sint8" => "Sint8",
        "uint8" => "Uint8",
        "sint16" => "Sint16",
        "uint16" => "Uint16",
        "sint32" => "Sint32",
        "uint32" => "Uint32",
        "string" => "String",
        "float32" => "Float32",
        "float64" => "Float64",
        "uint8z" => "Uint8z",
        "uint16z" => "Uint16z",
        "uint32z" => "Uint32z",
        "byte" => "Byte",
        "sint64" => "Sint64",
        "uint64" => "Uint64",
        "uint64z" => "Uint64z",
        _ => {
            return Err(Error::new_spanned(ident, "Unknown base type."));
        }
    };

    Ok(format_ident!("{}", variant, span = ident.span()))
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let identifier = if input.peek(LitInt) {
            FieldIdentifier::Number(input.parse::<LitInt>()?)
        } else {
            let ident = input.parse::<Ident>()?;

            if ident == "time" {
                FieldIdentifier::Time
            } else if ident == "timestamp" {
                FieldIdentifier::Timestamp
            } else {
                return Err(Error::new_spanned(
                    ident,
                    "Field identifier must be an integer literal, `time` or `timestamp`.",
                ));
            }
        };

        let mut attribute = Self {
            identifier,
            scale: None,
            offset: None,
            base: None,
            accumulate: false,
            handler: None,
        };

        while !input.is_empty() {
            input.parse::<Token![,]>()?;

            if input.is_empty() {
                break;
            }

            if input.peek(Token![|]) || input.peek(Token![move]) {
                attribute.handler = Some(input.parse::<ExprClosure>()?);
                continue;
            }

            let key = input.call(Ident::parse_any)?;

            if key == "scale" {
                input.parse::<Token![=]>()?;
                attribute.scale = Some(input.parse()?);
            } else if key == "offset" {
                input.parse::<Token![=]>()?;
                attribute.offset = Some(input.parse()?);
            } else if key == "base" {
                input.parse::<Token![=]>()?;
                attribute.base = Some(base_variant(&input.call(Ident::parse_any)?)?);
            } else if key == "accumulate" {
                attribute.accumulate = true;
            } else {
                return Err(Error::new_spanned(
                    key,
                    "Expected `scale`, `offset`, `base`, `accumulate` or a handler closure.",
                ));
            }
        }

        Ok(attribute)
    }
}
