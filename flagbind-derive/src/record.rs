use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, Lifetime, spanned::Spanned as _};

use crate::{
    common::{ParsedFieldInfo, compute_docs, sequence_element},
    generics::compute_generics,
};

/// The expression that classifies a field's type and produces its
/// `Binding`. Unsupported types aren't a compile error here; they produce a
/// binding that the registry rejects.
fn field_binding(field: &ParsedFieldInfo<'_>) -> TokenStream2 {
    match sequence_element(field.ty) {
        Some(element) => quote! {
            (&::flagbind::__private::ElementOf::<#element>::new())
                .flagbind_element_probe()
                .binding(field)
        },
        None => quote! {
            (&*field).flagbind_probe().binding(field)
        },
    }
}

fn describe_field(field: &ParsedFieldInfo<'_>, fields: &Ident) -> TokenStream2 {
    let ident = &field.ident;
    let name = field.ident.as_str();
    let binding = field_binding(field);

    let alias = field.alias.as_ref().map(|alias| {
        let alias = alias.as_str();
        quote! { .alias(#alias) }
    });

    let help = field.help.as_deref().map(|help| quote! { .help(#help) });
    let placeholder = field.placeholder.as_ref().map(|placeholder| {
        let placeholder = placeholder.as_str();
        quote! { .placeholder(#placeholder) }
    });

    quote! {
        {
            let field = &mut self.#ident;
            let binding = #binding;

            #fields.push(
                ::flagbind::record::FieldDescriptor::new(#name, binding)
                    #alias
                    #help
                    #placeholder
            );
        }
    }
}

fn derive_record_struct<'a>(
    input: &'a DeriveInput,
    fields: impl IntoIterator<Item = &'a Field>,
) -> syn::Result<TokenStream2> {
    let type_lifetime = compute_generics(&input.generics, "Record")?;
    let ident = &input.ident;

    let fields: Vec<ParsedFieldInfo<'a>> = fields
        .into_iter()
        .map(ParsedFieldInfo::from_field)
        .collect::<syn::Result<_>>()?;

    let description = compute_docs(&input.attrs)?;
    let lifetime = Lifetime::new("'__flagbind_record", Span::mixed_site());

    let fields_ident = Ident::new(
        match fields.is_empty() {
            true => "_fields",
            false => "fields",
        },
        Span::mixed_site(),
    );

    let described = fields
        .iter()
        .map(|field| describe_field(field, &fields_ident));

    Ok(quote! {
        impl #type_lifetime ::flagbind::record::Record for #ident #type_lifetime {
            const DESCRIPTION: &'static str = #description;

            fn describe<#lifetime>(
                &#lifetime mut self,
                #fields_ident: &mut ::flagbind::record::Fields<#lifetime>,
            ) {
                #[allow(unused_imports)]
                use ::flagbind::__private::{
                    BindableProbe as _,
                    ElementFallbackProbe as _,
                    ElementProbe as _,
                    FallbackProbe as _,
                };

                #(#described)*
            }
        }
    })
}

pub fn derive_record_result(item: TokenStream2) -> syn::Result<TokenStream2> {
    let input: DeriveInput = syn::parse2(item)?;

    match input.data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => derive_record_struct(&input, &fields.named),
            Fields::Unit => derive_record_struct(&input, []),
            Fields::Unnamed(ref fields) => Err(syn::Error::new(
                fields.span(),
                "can't derive `Record` on a tuple struct; fields need names, which become their flags",
            )),
        },
        Data::Enum(_) => Err(syn::Error::new(
            input.span(),
            "can't derive `Record` on an enum",
        )),
        Data::Union(_) => Err(syn::Error::new(
            input.span(),
            "can't derive `Record` on a union",
        )),
    }
}
