mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait from `stepwise-error` for the given struct.
///
/// The report is customized with the `error` attribute:
///
/// ```ignore
/// use stepwise_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of input", labels = ["add something here"])]
/// pub struct UnexpectedEof;
/// ```
///
/// | Tag       | Description                                                                  |
/// | --------- | ---------------------------------------------------------------------------- |
/// | `message` | The message displayed at the top of the report. Required.                    |
/// | `labels`  | An array of label texts, one per span of the error, in span order.           |
/// | `help`    | Optional help text describing what the user can do to fix the error.         |
///
/// Each tag accepts an expression. For structs with named fields, the expression is evaluated
/// with the fields in scope, so `format!("found {}", found)` works as expected. Tuple structs are
/// rejected.
///
/// The generated code refers to `ariadne` and `stepwise_error` by name, so both must be
/// dependencies of the crate using the derive.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl stepwise_error::ErrorKind for #name {
            #target
        }
    }.into()
}
