// Copyright (C) Microsoft Corporation. All rights reserved.

//! `#[test]` attribute that installs the `test_with_tracing` subscriber and
//! runs the test body inside a span named after the test.

use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::Error;
use syn::ItemFn;

/// Drop-in replacement for `#[test]`.
///
/// The test function must be synchronous and take no arguments. It may
/// return a `Result` like any other test.
#[proc_macro_attribute]
pub fn test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = syn::parse_macro_input!(item as ItemFn);
    make_test(item)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn make_test(item: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    if item.sig.asyncness.is_some() {
        return Err(Error::new(
            item.sig.fn_token.span(),
            "test function must not be async",
        ));
    }
    if !item.sig.inputs.is_empty() {
        return Err(Error::new(item.sig.inputs.span(), "expected 0 arguments"));
    }

    let name = &item.sig.ident;
    let return_type = &item.sig.output;
    let attrs = &item.attrs;

    Ok(quote! {
        #[::core::prelude::v1::test]
        #(#attrs)*
        fn #name() #return_type {
            #item
            ::test_with_tracing::init();
            let span = ::test_with_tracing::tracing::info_span!(stringify!(#name));
            let _span_guard = span.enter();
            #name()
        }
    })
}
