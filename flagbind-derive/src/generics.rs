use itertools::Itertools;
use proc_macro2::{Punct, TokenStream as TokenStream2, TokenTree as TokenTree2};
use quote::ToTokens;
use syn::{Generics, Lifetime, spanned::Spanned};

/// A lifetime that, when rendered with `to_tokens`, includes `< >` around it.
/// This exists because you can wrap it in `Option` to make it easy to omit
/// or include an entire generics clause.
pub struct AngleBracedLifetime {
    lifetime: Lifetime,
}

impl ToTokens for AngleBracedLifetime {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        use proc_macro2::Spacing::*;

        tokens.extend([TokenTree2::Punct(Punct::new('<', Alone))]);
        self.lifetime.to_tokens(tokens);
        tokens.extend([TokenTree2::Punct(Punct::new('>', Alone))]);
    }
}

/// Records may have at most one lifetime (and no other generics). Returns
/// that lifetime, ready to be placed after both `impl` and the type name.
pub fn compute_generics(
    generics: &Generics,
    derive: &str,
) -> syn::Result<Option<AngleBracedLifetime>> {
    if let Some(param) = generics.const_params().next() {
        return Err(syn::Error::new(
            param.span(),
            format!("const generics aren't supported by `derive({derive})`"),
        ));
    }

    if let Some(param) = generics.type_params().next() {
        return Err(syn::Error::new(
            param.span(),
            format!("generic types aren't supported by `derive({derive})`"),
        ));
    }

    generics
        .lifetimes()
        .at_most_one()
        .map(|param| {
            param.map(|param| AngleBracedLifetime {
                lifetime: param.lifetime.clone(),
            })
        })
        .map_err(|_| {
            syn::Error::new(
                generics.params.span(),
                format!("`derive({derive})` type may have at most one lifetime"),
            )
        })
}
