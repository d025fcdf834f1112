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

use troupe::prelude::*;

/// What a `Counter` is asked to do.
#[troupe_message]
pub enum Tally {
    /// Record a value.
    Add(u64),
    /// Sleep for the given milliseconds, then record them.
    Pause(u64),
    /// Return an error.
    Fail,
    /// Panic.
    Panic,
}

/// Requests understood by a `Calculator`.
#[troupe_message]
pub enum Query {
    Double(u64),
    /// Sleep for `.0` milliseconds, then answer with `.1`.
    Slow(u64, u64),
    /// Answer with no value.
    Nothing,
    Fail,
    Panic,
}
