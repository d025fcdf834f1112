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
#![forbid(unsafe_code)]

//! Troupe Macro Library
//!
//! Attribute macros that remove boilerplate from Troupe message and actor declarations.
//!
//! # Message Macro
//!
//! ```ignore
//! #[troupe_message]
//! pub struct Deposit {
//!     pub amount: u64,
//! }
//! ```
//!
//! # Actor Macro
//!
//! ```ignore
//! #[troupe_actor]
//! pub struct Ledger {
//!     balance: u64,
//! }
//! ```

use proc_macro::TokenStream;

use quote::quote;
use syn::{parse_macro_input, DeriveInput};

fn has_derive(input: &DeriveInput, trait_name: &str) -> bool {
    input.attrs.iter().any(|attr| {
        if attr.path().is_ident("derive") {
            let mut found = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(trait_name) {
                    found = true;
                }
                Ok(())
            });
            found
        } else {
            false
        }
    })
}

/// Options parsed from `#[troupe_actor(...)]`.
#[derive(Default)]
struct ActorOptions {
    /// Skip deriving `Default`; the type provides its own.
    no_default: bool,
}

impl ActorOptions {
    fn parse(attr: &TokenStream) -> Self {
        let mut options = Self::default();
        for part in attr.to_string().split(',') {
            if part.trim() == "no_default" {
                options.no_default = true;
            }
        }
        options
    }
}

/// Declares a type as a Troupe message.
///
/// Derives `Clone` and `Debug` when they are not already derived and adds a compile-time
/// assertion that the type is `Send + Sync + 'static`, which is what timers (which clone the
/// message on every tick) and hash routers expect of a message.
///
/// ```ignore
/// use troupe_macro::troupe_message;
///
/// #[troupe_message]
/// pub struct Tick;
/// ```
#[proc_macro_attribute]
pub fn troupe_message(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let derives = {
        let mut traits = Vec::new();
        if !has_derive(&input, "Clone") {
            traits.push(quote!(Clone));
        }
        if !has_derive(&input, "Debug") {
            traits.push(quote!(Debug));
        }
        if traits.is_empty() {
            quote!()
        } else {
            quote!(#[derive(#(#traits),*)])
        }
    };

    let assert_ident = quote::format_ident!("_AssertTroupeMessage_{}", name);

    let expanded = quote! {
        #derives
        #input

        #[doc(hidden)]
        #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::needless_lifetimes)]
        const _: () = {
            fn #assert_ident #impl_generics () #where_clause {
                fn assert_bounds<T: Send + Sync + 'static>() {}
                assert_bounds::<#name #ty_generics>();
            }
        };
    };

    TokenStream::from(expanded)
}

/// Declares a type as a Troupe actor.
///
/// Derives `Default` and `Debug` when missing, so the type can be spawned through
/// `DefaultFactory`, and asserts that the type is `Send + 'static`, which every actor kind
/// requires because its drain loop runs on the Tokio pool.
///
/// Pass `no_default` when the type implements `Default` by hand:
///
/// ```ignore
/// #[troupe_actor(no_default)]
/// struct Clock {
///     started: std::time::Instant,
/// }
///
/// impl Default for Clock {
///     fn default() -> Self {
///         Self { started: std::time::Instant::now() }
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn troupe_actor(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = ActorOptions::parse(&attr);
    let input = parse_macro_input!(item as DeriveInput);

    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let derives = {
        let mut traits = Vec::new();
        if !options.no_default && !has_derive(&input, "Default") {
            traits.push(quote!(Default));
        }
        if !has_derive(&input, "Debug") {
            traits.push(quote!(Debug));
        }
        if traits.is_empty() {
            quote!()
        } else {
            quote!(#[derive(#(#traits),*)])
        }
    };

    let assert_ident = quote::format_ident!("_AssertTroupeActor_{}", name);

    let expanded = quote! {
        #derives
        #input

        #[doc(hidden)]
        #[allow(dead_code, non_camel_case_types, non_snake_case, clippy::needless_lifetimes)]
        const _: () = {
            fn #assert_ident #impl_generics () #where_clause {
                fn assert_bounds<T: Send + 'static>() {}
                assert_bounds::<#name #ty_generics>();
            }
        };
    };

    TokenStream::from(expanded)
}
