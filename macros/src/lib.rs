//! Augment the development of packet tests with procedural macros.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, ItemFn, LitStr};

/// Run a test function with a `tracing` subscriber that writes to the test
/// output, filtered to the given level (`"DEBUG"` if omitted).
///
/// The calling crate must depend on `tracing` and `tracing-subscriber`.
///
/// # Example
/// ```rust,ignore
/// use galileo_macros::test_traced;
///
/// #[test_traced("INFO")]
/// fn test_grows() {
///     tracing::info!("visible in test output");
/// }
/// ```
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let level = if attr.is_empty() {
        String::from("DEBUG")
    } else {
        parse_macro_input!(attr as LitStr).value()
    };
    let level = match level.to_ascii_uppercase().as_str() {
        "TRACE" => quote! { ::tracing::Level::TRACE },
        "DEBUG" => quote! { ::tracing::Level::DEBUG },
        "INFO" => quote! { ::tracing::Level::INFO },
        "WARN" => quote! { ::tracing::Level::WARN },
        "ERROR" => quote! { ::tracing::Level::ERROR },
        other => {
            return syn::Error::new(Span::call_site(), format!("invalid log level: {other}"))
                .to_compile_error()
                .into();
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            let subscriber = ::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(#level)
                .with_line_number(true)
                .finish();
            ::tracing::subscriber::with_default(subscriber, || #block)
        }
    };
    TokenStream::from(expanded)
}
