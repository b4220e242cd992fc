mod common;
mod convertible;
mod generics;
mod record;

use proc_macro::TokenStream;

/// Implement `Record` for a struct with named fields. Each field becomes a
/// flag named after it; doc comments become help text.
///
/// Field attributes, all under `#[flagbind(...)]`:
///
/// - `alias = "n"`: an additional name for the flag
/// - `help = "..."`: help text, instead of the doc comment
/// - `placeholder = "NAME"`: how the value is shown in usage messages
///
/// Sequence fields are recognized by being spelled `Vec<T>`. Behind a type
/// alias, an unsupported element is reported as an unsupported type for the
/// whole field.
#[proc_macro_derive(Record, attributes(flagbind))]
pub fn derive_record(item: TokenStream) -> TokenStream {
    match record::derive_record_result(item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Implement `Convertible` for a newtype struct, or for an enum whose unit
/// variants are matched case-insensitively by their kebab-case names. An enum
/// may have one variant carrying a value, which is used for anything else.
#[proc_macro_derive(Convertible)]
pub fn derive_convertible(item: TokenStream) -> TokenStream {
    match convertible::derive_convertible_result(item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
