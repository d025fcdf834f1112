/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use proc_macro::TokenStream;

use quote::quote;
use syn::{parse_macro_input, ItemFn};

/// Turns an `async fn` into a `#[test]` that runs on a fresh multi-threaded Tokio runtime.
///
/// Panics raised anywhere in the runtime (including inside spawned actor drain loops) are
/// captured by a hook. If the body finished but a panic was recorded, the test fails with the
/// panic location and message. The body runs inside a `troupe_test` tracing span named after
/// the test function.
///
/// The expansion refers to `::troupe_test::reexports`, so the calling crate only needs a
/// dependency on `troupe-test`.
#[proc_macro_attribute]
pub fn troupe_test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    let vis = &input.vis;
    let sig = &input.sig;
    let body = &input.block;
    let attrs = &input.attrs;
    let name = &sig.ident;
    let inputs = &sig.inputs;
    let output = &sig.output;

    let async_name = syn::Ident::new(&format!("__{name}_async"), name.span());

    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis fn #name() {
            use std::sync::atomic::{AtomicBool, Ordering};
            use std::sync::Arc;
            use std::panic;
            use ::troupe_test::reexports::parking_lot::Mutex;
            use ::troupe_test::reexports::tracing;

            #[derive(Default)]
            struct CapturedPanic {
                occurred: AtomicBool,
                message: Mutex<Option<String>>,
                location: Mutex<Option<String>>,
            }

            let captured = Arc::new(CapturedPanic::default());
            let hook_state = Arc::clone(&captured);

            let previous_hook = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                hook_state.occurred.store(true, Ordering::SeqCst);
                let message = info
                    .payload()
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| info.payload().downcast_ref::<String>().cloned());
                *hook_state.message.lock() = message.clone();
                *hook_state.location.lock() = info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
                let cleaned = message
                    .unwrap_or_else(|| "No error message".to_string())
                    .trim()
                    .replace('\n', " ");
                tracing::error!("Panic: {}", cleaned);
                previous_hook(info);
            }));

            let runtime = ::troupe_test::reexports::tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("failed to build the test runtime");

            let result = runtime.block_on(async {
                let test_span = tracing::info_span!("troupe_test", name = stringify!(#name));
                let _enter = test_span.enter();
                #async_name().await
            });

            // Drop the runtime first so panics from lingering tasks are recorded before we look.
            drop(runtime);

            if captured.occurred.load(Ordering::SeqCst) {
                let location = captured
                    .location
                    .lock()
                    .clone()
                    .unwrap_or_else(|| "unknown location".to_string());
                let message = captured
                    .message
                    .lock()
                    .clone()
                    .unwrap_or_else(|| "No error message".to_string());
                panic!("Panic at {}: {}", location, message.trim().replace('\n', " "));
            }

            result.unwrap()
        }

        async fn #async_name(#inputs) #output #body
    };

    expanded.into()
}
