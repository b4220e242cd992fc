use heck::ToKebabCase as _;
use itertools::Itertools as _;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Data, DeriveInput, Fields, FieldsNamed, FieldsUnnamed, Ident, Index, Member, Token, Variant,
    ext::IdentExt as _, punctuated::Punctuated, spanned::Spanned as _,
};

/// An enum variant that carries a single field, which is coerced from any
/// text that doesn't name one of the unit variants.
struct Fallback<'a> {
    variant: &'a Ident,
    field: Option<&'a Ident>,
}

struct AnalyzedEnum<'a> {
    variants: Vec<(String, &'a Ident)>,
    fallback: Option<Fallback<'a>>,
}

impl<'a> AnalyzedEnum<'a> {
    fn from_variants(variants: impl IntoIterator<Item = &'a Variant>) -> syn::Result<Self> {
        let mut fallback = None;
        let mut collected = Vec::new();

        for variant in variants {
            match variant.fields {
                Fields::Unit => collected.push((
                    variant.ident.unraw().to_string().to_kebab_case(),
                    &variant.ident,
                )),
                Fields::Unnamed(FieldsUnnamed {
                    unnamed: ref fields,
                    ..
                })
                | Fields::Named(FieldsNamed {
                    named: ref fields, ..
                }) => match fields.iter().exactly_one() {
                    Ok(field) => match fallback {
                        Some(_) => {
                            return Err(syn::Error::new(
                                variant.span(),
                                "only one variant may carry a value",
                            ));
                        }
                        None => {
                            fallback = Some(Fallback {
                                variant: &variant.ident,
                                field: field.ident.as_ref(),
                            })
                        }
                    },
                    Err(_) => {
                        return Err(syn::Error::new(
                            variant.span(),
                            "a variant carrying a value must have exactly one field",
                        ));
                    }
                },
            }
        }

        if let Some((name, variant)) = collected
            .iter()
            .tuple_combinations()
            .find_map(|(a, b)| a.0.eq_ignore_ascii_case(&b.0).then_some(b))
        {
            return Err(syn::Error::new(
                variant.span(),
                format!("more than one variant is spelled {name:?}"),
            ));
        }

        Ok(AnalyzedEnum {
            variants: collected,
            fallback,
        })
    }
}

fn derive_convertible_enum(
    ident: &Ident,
    variants: &Punctuated<Variant, Token![,]>,
) -> syn::Result<TokenStream2> {
    let analyzed = AnalyzedEnum::from_variants(variants)?;

    let unit_checks = analyzed.variants.iter().map(|(name, variant)| {
        quote! {
            if text.eq_ignore_ascii_case(#name) {
                return ::core::result::Result::Ok(Self::#variant);
            }
        }
    });

    let names = analyzed.variants.iter().map(|(name, _)| name.as_str());

    let unit_renders = analyzed.variants.iter().map(|(name, variant)| {
        quote! {
            Self::#variant => ::core::option::Option::Some(::std::string::String::from(#name)),
        }
    });

    let (error, otherwise, fallback_render) = match analyzed.fallback {
        Some(fallback) => {
            let variant = fallback.variant;

            let (body, pattern) = match fallback.field {
                Some(field) => (quote! { { #field: value } }, quote! { { #field: ref value } }),
                None => (quote! { ( value ) }, quote! { ( ref value ) }),
            };

            (
                quote! { ::flagbind::errors::ValueError },
                quote! {
                    match ::flagbind::record::Element::coerce(text) {
                        ::core::result::Result::Ok(value) => {
                            ::core::result::Result::Ok(Self::#variant #body)
                        }
                        ::core::result::Result::Err(err) => ::core::result::Result::Err(err),
                    }
                },
                quote! {
                    Self::#variant #pattern => ::flagbind::record::Element::render_default(value),
                },
            )
        }
        None => (
            quote! { ::flagbind::errors::UnknownVariant },
            quote! {
                ::core::result::Result::Err(::flagbind::errors::UnknownVariant::new(
                    text,
                    &[ #(#names,)* ],
                ))
            },
            TokenStream2::new(),
        ),
    };

    Ok(quote! {
        impl ::flagbind::record::Convertible for #ident {
            type Err = #error;

            fn parse_from_string(text: &str) -> ::core::result::Result<Self, Self::Err> {
                #(#unit_checks)*
                #otherwise
            }

            fn render_default(&self) -> ::core::option::Option<::std::string::String> {
                match *self {
                    #(#unit_renders)*
                    #fallback_render
                }
            }
        }
    })
}

fn derive_convertible_newtype(ident: &Ident, field: Option<&Ident>) -> TokenStream2 {
    let struct_body = match field {
        Some(field) => quote! { { #field: value } },
        None => quote! { ( value ) },
    };

    let member = match field {
        Some(field) => Member::Named(field.clone()),
        None => Member::Unnamed(Index::from(0)),
    };

    quote! {
        impl ::flagbind::record::Convertible for #ident {
            type Err = ::flagbind::errors::ValueError;

            fn parse_from_string(text: &str) -> ::core::result::Result<Self, Self::Err> {
                match ::flagbind::record::Element::coerce(text) {
                    ::core::result::Result::Ok(value) => {
                        ::core::result::Result::Ok(Self #struct_body)
                    }
                    ::core::result::Result::Err(err) => ::core::result::Result::Err(err),
                }
            }

            fn render_default(&self) -> ::core::option::Option<::std::string::String> {
                ::flagbind::record::Element::render_default(&self.#member)
            }
        }
    }
}

pub fn derive_convertible_result(item: TokenStream2) -> syn::Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(item)?;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "`derive(Convertible)` types can't be generic",
        ));
    }

    match input.data {
        Data::Struct(ref data) => {
            let field = data.fields.iter().exactly_one().map_err(|_| {
                syn::Error::new(
                    input.span(),
                    "can only derive `Convertible` on structs with exactly one field",
                )
            })?;

            Ok(derive_convertible_newtype(&input.ident, field.ident.as_ref()))
        }
        Data::Enum(ref data) => derive_convertible_enum(&input.ident, &data.variants),
        Data::Union(_) => Err(syn::Error::new(
            input.span(),
            "can't derive `Convertible` on a union",
        )),
    }
}
