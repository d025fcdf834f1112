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

//! System-level components: the [`ActorSystem`] facade, per-kind [`Registry`] maps, the
//! [`Scheduler`], configuration and the stock error sink.

// --- Public Re-exports ---
pub use actor_system::{ActorSystem, SystemBuilder};
pub use config::{TroupeConfig, CONFIG};
pub use registry::Registry;
pub use scheduler::{Scheduler, TimerHandle, TimerKey};
pub use tracing_sink::TracingSink;

// --- Submodules ---

/// Defines the `ActorSystem` entry point and its builder.
mod actor_system;
/// Defines the configuration system for Troupe.
pub mod config;
/// Defines the per-kind name registry.
mod registry;
/// Defines periodic and one-shot timers.
mod scheduler;
/// Defines the `tracing`-backed error sink.
mod tracing_sink;
