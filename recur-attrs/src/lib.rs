mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the [`ErrorKind`] trait for the given struct.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use recur_attrs::ErrorKind;
/// use recur_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "the recurrence has no left-hand side", labels = ["here"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | The texts of the labels that point to the spans of the error, in order.      |
/// | `help`      | Optional help text for the error, describing what the user can do to fix it. |
///
/// Each tag accepts an expression. For structs with named fields, the expression is evaluated
/// with the members of the struct in scope (as references), so they can be used in the
/// expression; `self` is also available. Tuple structs are not supported.
///
/// `labels` may be omitted, which is the usual case for errors that do not come from source
/// code. Labels without a matching span are dropped, as are spans without a matching label.
///
/// [`ErrorKind`]: https://docs.rs/recur-error
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            #target
        }
    }.into()
}
