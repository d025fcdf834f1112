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

//! Routing actors and the strategies that pick their routees.
//!
//! Routers are ordinary actors holding a pool of references. They only ever `tell` or
//! `forward` to a routee, never touch its mailbox.

pub use hash_sharding::HashSharding;
pub use least_loaded::LeastLoaded;
pub use round_robin::RoundRobin;
pub use router::{ReplyRouter, Router};

mod hash_sharding;
mod least_loaded;
mod round_robin;
#[allow(clippy::module_inception)]
mod router;
