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

//! Testing utilities for Troupe actors.
//!
//! The [`troupe_test`](prelude::troupe_test) attribute runs an `async fn` test on its own
//! multi-threaded Tokio runtime and fails the test if any task panicked, even when the panic
//! happened inside a detached drain loop.
//!
//! ```rust,ignore
//! use troupe_test::prelude::*;
//!
//! #[troupe_test]
//! async fn counts_messages() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```
//!
//! Tests that deliberately panic inside actors should use `#[tokio::test]` instead, since the
//! panic hook installed here cannot tell an intentional panic from a real one.

/// Commonly used items for writing tests.
pub mod prelude {
    pub use troupe_test_macro::troupe_test;
}

/// Crates referenced by the `troupe_test` expansion.
#[doc(hidden)]
pub mod reexports {
    pub use parking_lot;
    pub use tokio;
    pub use tracing;
}
