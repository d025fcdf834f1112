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

use std::time::Duration;

/// Errors raised synchronously by the runtime to the caller of an operation.
///
/// Failures inside an actor's own receive logic never surface here: they are caught at the
/// runner boundary, logged, and (for asks) turn into an empty reply.
#[derive(Debug)]
pub enum ActorError {
    /// An actor of this type with this name already exists in the system.
    DuplicateActor {
        /// The Rust type name of the actor.
        actor_type: &'static str,
        /// The colliding name.
        name: String,
    },
    /// The factory could not build the actor instance.
    Construction {
        /// The Rust type name of the actor.
        actor_type: &'static str,
        /// The name the actor would have had.
        name: String,
        /// What the factory reported.
        source: anyhow::Error,
    },
    /// A registration cell was found without the actor it should hold.
    MissingRegistration {
        /// The Rust type name of the actor.
        actor_type: &'static str,
        /// The affected name.
        name: String,
    },
    /// A periodic timer with this name already exists for the target actor.
    DuplicateTimer {
        /// Name of the actor that owns the timer.
        owner: String,
        /// The colliding timer name.
        timer: String,
    },
    /// No periodic timer with this name exists for the target actor.
    TimerNotFound {
        /// Name of the actor the timer was looked up for.
        owner: String,
        /// The missing timer name.
        timer: String,
    },
    /// An ask did not complete within its deadline.
    AskTimeout {
        /// Name of the actor that was asked.
        actor: String,
        /// The deadline that elapsed.
        after: Duration,
    },
    /// The ask was dropped before a reply could be produced, because the actor was shut
    /// down before or while the request was queued.
    Cancelled {
        /// Name of the actor that was asked.
        actor: String,
    },
}

impl std::fmt::Display for ActorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorError::DuplicateActor { actor_type, name } => {
                write!(f, "an actor of type {actor_type} named '{name}' already exists")
            }
            ActorError::Construction { actor_type, name, source } => {
                write!(f, "failed to construct actor {actor_type} '{name}': {source}")
            }
            ActorError::MissingRegistration { actor_type, name } => {
                write!(f, "registration for {actor_type} '{name}' holds no actor")
            }
            ActorError::DuplicateTimer { owner, timer } => {
                write!(f, "actor '{owner}' already has a periodic timer named '{timer}'")
            }
            ActorError::TimerNotFound { owner, timer } => {
                write!(f, "actor '{owner}' has no periodic timer named '{timer}'")
            }
            ActorError::AskTimeout { actor, after } => {
                write!(f, "ask to '{actor}' timed out after {after:?}")
            }
            ActorError::Cancelled { actor } => {
                write!(f, "ask to '{actor}' was cancelled")
            }
        }
    }
}

impl std::error::Error for ActorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActorError::Construction { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl ActorError {
    /// Returns `true` for the timeout raised by a bounded ask.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ActorError::AskTimeout { .. })
    }

    /// Returns `true` when an ask was dropped because the actor shut down.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ActorError::Cancelled { .. })
    }
}
