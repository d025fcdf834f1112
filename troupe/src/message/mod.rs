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

pub use actor_error::ActorError;
pub use actor_name::{ActorId, ActorName};
pub use address::Address;
pub use envelope::Envelope;
pub(crate) use envelope::ReplyEnvelope;
pub use promise::{Cancelled, Promise, Reply};

/// Runtime errors returned to callers.
mod actor_error;
/// Actor names and ids.
mod actor_name;
/// Type-erased sender identity.
mod address;
/// Queued message wrappers.
mod envelope;
/// Single-assignment reply cells.
mod promise;
