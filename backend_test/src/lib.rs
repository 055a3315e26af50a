use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one and inject dependencies.
///
/// Every test gets its own election state. With `#[backend_test(seeded)]` it
/// starts with the example voters and candidates, otherwise it starts empty.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`] and
/// [`crate::model::ElectionStore`], both backed by the same state.
#[proc_macro_attribute]
pub fn backend_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let seeded = match parse_macro_input!(args as Option<Ident>) {
        None => false,
        Some(arg) if arg == "seeded" => true,
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `seeded` or no argument")
                .into_compile_error()
                .into();
        }
    };

    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract type information and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    let store = if seeded {
        quote! { crate::model::ElectionStore::example() }
    } else {
        quote! { crate::model::ElectionStore::default() }
    };

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// The test itself.
            #item_fn

            log4rs_test_utils::test_logging::init_logging_once_for(["tally_backend"], None, None);

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            // The client is built and dropped inside the runtime, whether or
            // not the test asks for it.
            runtime.block_on(async move {
                let store = #store;
                #[allow(unused_variables)]
                let rocket_client =
                    rocket::local::asynchronous::Client::tracked(crate::rocket_for_store(store.clone()))
                        .await
                        .unwrap();
                #new_name(#(#test_args),*).await;
            });
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_store = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let Pat::Ident(_) = &*pat_type.pat {
                if let Type::Path(type_path) = &*pat_type.ty {
                    if let Some(type_ident) = type_path.path.get_ident() {
                        if type_ident == "Client" {
                            if has_client {
                                return Err(syn::Error::new(input.span(), "Test cannot accept more than one `rocket::local::asynchronous::Client`"));
                            }
                            has_client = true;
                            args.push(quote! { rocket_client });
                            continue;
                        } else if type_ident == "ElectionStore" {
                            if has_store {
                                return Err(syn::Error::new(
                                    input.span(),
                                    "Test cannot accept more than one `ElectionStore`",
                                ));
                            }
                            has_store = true;
                            args.push(quote! { store });
                            continue;
                        }
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client` or `store_ident: ElectionStore`",
        ));
    }

    Ok(args)
}
