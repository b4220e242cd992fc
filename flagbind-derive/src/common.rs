use darling::{FromAttributes as _, util::SpannedValue};
use itertools::Itertools as _;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::{
    Attribute, Expr, Field, GenericArgument, Ident, PathArguments, Type, ext::IdentExt as _,
    spanned::Spanned as _,
};

/// An identifier along with its unraw string form, which is what flag names
/// are computed from.
pub struct IdentString<'a> {
    raw: &'a Ident,
    string: String,
}

impl<'a> IdentString<'a> {
    pub fn new(ident: &'a Ident) -> Self {
        Self {
            string: ident.unraw().to_string(),
            raw: ident,
        }
    }

    pub fn as_str(&self) -> &str {
        self.string.as_str()
    }
}

impl ToTokens for IdentString<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        self.raw.to_tokens(tokens);
    }
}

#[derive(darling::FromAttributes, Debug)]
#[darling(attributes(flagbind))]
struct RawParsedAttr {
    alias: Option<SpannedValue<String>>,
    help: Option<String>,
    placeholder: Option<SpannedValue<String>>,
}

/// Collect the `#[doc]` attributes into help text. Lines of a paragraph are
/// joined with spaces; blank lines separate paragraphs.
pub fn compute_docs(attrs: &[Attribute]) -> syn::Result<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter_map(|attr| match attr.meta {
            syn::Meta::NameValue(ref meta) => Some(meta),
            _ => None,
        })
        .filter(|meta| meta.path.is_ident("doc"))
        .map(|meta| match meta.value {
            Expr::Lit(ref lit) => match lit.lit {
                syn::Lit::Str(ref lit) => Ok(lit.value()),
                _ => Err(syn::Error::new(meta.span(), "malformed #[doc] attribute")),
            },
            Expr::Macro(ref expr) => Err(syn::Error::new(
                expr.span(),
                "macro #[doc] attributes aren't supported",
            )),
            _ => Err(syn::Error::new(meta.span(), "malformed #[doc] attribute")),
        })
        .map_ok(|doc| doc.trim().to_owned())
        .collect::<syn::Result<_>>()?;

    Ok(lines
        .split(|line| line.is_empty())
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| paragraph.iter().join(" "))
        .join("\n"))
}

/// If `ty` is syntactically `Vec<T>`, get `T`.
pub fn sequence_element(ty: &Type) -> Option<&Type> {
    let Type::Path(ref path) = *ty else {
        return None;
    };

    if path.qself.is_some() {
        return None;
    }

    let segment = path.path.segments.last()?;
    if segment.ident != "Vec" {
        return None;
    }

    let PathArguments::AngleBracketed(ref arguments) = segment.arguments else {
        return None;
    };

    match arguments.args.iter().exactly_one() {
        Ok(GenericArgument::Type(element)) => Some(element),
        _ => None,
    }
}

pub struct ParsedFieldInfo<'a> {
    pub ident: IdentString<'a>,
    pub ty: &'a Type,
    pub alias: Option<SpannedValue<String>>,
    pub help: Option<String>,
    pub placeholder: Option<SpannedValue<String>>,
}

impl<'a> ParsedFieldInfo<'a> {
    pub fn from_field(field: &'a Field) -> syn::Result<Self> {
        let parsed = RawParsedAttr::from_attributes(&field.attrs)?;

        let ident = field.ident.as_ref().map(IdentString::new).ok_or_else(|| {
            syn::Error::new(
                field.span(),
                "record fields need names, which become their flags",
            )
        })?;

        let alias = parsed.alias.map(compute_alias).transpose()?;

        let help = match parsed.help {
            Some(help) => Some(help),
            None => Some(compute_docs(&field.attrs)?).filter(|docs| !docs.is_empty()),
        };

        let placeholder = parsed.placeholder.map(compute_placeholder).transpose()?;

        Ok(Self {
            ty: &field.ty,
            ident,
            alias,
            help,
            placeholder,
        })
    }
}

fn compute_alias(alias: SpannedValue<String>) -> syn::Result<SpannedValue<String>> {
    if alias.is_empty() {
        Err(syn::Error::new(alias.span(), "alias must not be empty"))
    } else if alias.starts_with('-') {
        Err(syn::Error::new(
            alias.span(),
            "aliases don't need to start with '-'; this is handled automatically",
        ))
    } else if alias.contains('=') {
        Err(syn::Error::new(
            alias.span(),
            "aliases must not include an '=', as it is the value separator",
        ))
    } else if alias.contains(|c: char| c.is_whitespace()) {
        Err(syn::Error::new(
            alias.span(),
            "aliases shouldn't include whitespace",
        ))
    } else {
        Ok(alias)
    }
}

fn compute_placeholder(placeholder: SpannedValue<String>) -> syn::Result<SpannedValue<String>> {
    if placeholder.is_empty() {
        Err(syn::Error::new(placeholder.span(), "placeholder must not be empty"))
    } else if placeholder.contains(|c: char| c.is_whitespace()) {
        Err(syn::Error::new(
            placeholder.span(),
            "placeholder shouldn't include whitespace",
        ))
    } else {
        Ok(placeholder)
    }
}
