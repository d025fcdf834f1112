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

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use once_cell::sync::OnceCell;
use tracing::{debug, instrument, trace};

use crate::message::{ActorError, ActorId, ActorName};
use crate::traits::Reference;

type Registration<R> = Arc<OnceCell<R>>;

/// The actors of one kind in one system, by case-insensitive name.
///
/// A name is reserved with an empty cell before the actor is built, so concurrent spawns of the
/// same name construct at most one actor; the losers get [`ActorError::DuplicateActor`].
/// Registrations whose actor was shut down through its handle count as absent.
pub struct Registry<R: Reference> {
    actor_type: &'static str,
    actors: DashMap<String, Registration<R>>,
}

impl<R: Reference> Registry<R> {
    pub(crate) fn new(actor_type: &'static str) -> Self {
        Self {
            actor_type,
            actors: DashMap::new(),
        }
    }

    /// The Rust type name of the actors held here.
    pub fn actor_type(&self) -> &'static str {
        self.actor_type
    }

    /// Reserves `name` and builds its actor exactly once.
    pub(crate) fn spawn_with<F>(&self, name: ActorName, build: F) -> Result<R, ActorError>
    where
        F: FnOnce(&ActorName) -> Result<R, ActorError>,
    {
        let key = name.key().to_string();
        let cell = match self.actors.entry(key.clone()) {
            Entry::Vacant(slot) => {
                let cell: Registration<R> = Arc::new(OnceCell::new());
                slot.insert(Arc::clone(&cell));
                cell
            }
            Entry::Occupied(mut slot) => {
                let reusable = slot
                    .get()
                    .get()
                    .is_some_and(|existing| !existing.is_alive());
                if !reusable {
                    return Err(ActorError::DuplicateActor {
                        actor_type: self.actor_type,
                        name: name.to_string(),
                    });
                }
                debug!(actor = %name, "replacing registration of a shut-down actor");
                let cell: Registration<R> = Arc::new(OnceCell::new());
                slot.insert(Arc::clone(&cell));
                cell
            }
        };

        let reference = match cell.get_or_try_init(|| build(&name)) {
            Ok(reference) => reference.clone(),
            Err(error) => {
                self.actors
                    .remove_if(&key, |_, current| Arc::ptr_eq(current, &cell));
                return Err(error);
            }
        };

        // The name may have been released while the actor was under construction.
        let still_registered = self
            .actors
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current.value(), &cell));
        if !still_registered {
            reference.shutdown();
            return Err(ActorError::MissingRegistration {
                actor_type: self.actor_type,
                name: name.to_string(),
            });
        }

        trace!(actor = %name, actor_type = self.actor_type, "registered");
        Ok(reference)
    }

    /// The live actor registered under `name`.
    pub fn get(&self, name: &str) -> Option<R> {
        self.actors
            .get(&name.to_lowercase())
            .and_then(|cell| cell.get().cloned())
            .filter(Reference::is_alive)
    }

    /// Whether a live actor is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every live actor.
    pub fn references(&self) -> Vec<R> {
        self.actors
            .iter()
            .filter_map(|entry| entry.value().get().cloned())
            .filter(Reference::is_alive)
            .collect()
    }

    /// Number of live actors.
    pub fn len(&self) -> usize {
        self.references().len()
    }

    /// Whether there are no live actors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shuts down the actor registered under `name` and removes it.
    pub fn shutdown(&self, name: &str) -> bool {
        match self.actors.remove(&name.to_lowercase()) {
            Some((_, cell)) => cell.get().is_some_and(Reference::shutdown),
            None => false,
        }
    }

    /// Shuts down `reference` and removes its registration.
    pub fn shutdown_ref(&self, reference: &R) -> bool {
        let stopped = reference.shutdown();
        self.forget(reference);
        stopped
    }

    /// Gracefully shuts down the actor registered under `name`, then removes it.
    #[instrument(skip(self), fields(actor_type = self.actor_type))]
    pub async fn graceful_shutdown(&self, name: &str, max_wait: Duration) -> bool {
        match self.get(name) {
            Some(reference) => self.graceful_shutdown_ref(&reference, max_wait).await,
            None => false,
        }
    }

    /// Gracefully shuts down `reference`, then removes its registration.
    pub async fn graceful_shutdown_ref(&self, reference: &R, max_wait: Duration) -> bool {
        let drained = reference.graceful_shutdown(max_wait).await;
        self.forget(reference);
        drained
    }

    fn forget(&self, reference: &R) {
        self.forget_id(reference.name().key(), reference.id());
    }

    fn forget_id(&self, key: &str, id: ActorId) {
        self.actors
            .remove_if(key, |_, cell| cell.get().is_some_and(|current| current.id() == id));
    }

    fn has_pending(&self) -> bool {
        self.references()
            .iter()
            .any(|reference| !reference.is_idle() || reference.queued() > 0)
    }
}

impl<R: Reference> fmt::Debug for Registry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("actor_type", &self.actor_type)
            .field("registrations", &self.actors.len())
            .finish()
    }
}

/// The type-independent view of a registry used by the system.
pub(crate) trait AnyRegistry: Send + Sync + 'static {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn has_pending(&self) -> bool;
    fn live_count(&self) -> usize;
    fn forget(&self, key: &str, id: ActorId);
    fn graceful_shutdown_all(self: Arc<Self>, max_wait: Duration) -> BoxFuture<'static, usize>;
}

impl<R: Reference> AnyRegistry for Registry<R> {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn has_pending(&self) -> bool {
        Registry::has_pending(self)
    }

    fn live_count(&self) -> usize {
        self.len()
    }

    fn forget(&self, key: &str, id: ActorId) {
        self.forget_id(key, id);
    }

    /// Returns how many actors drained before their deadline.
    fn graceful_shutdown_all(self: Arc<Self>, max_wait: Duration) -> BoxFuture<'static, usize> {
        async move {
            let references = self.references();
            let outcomes = join_all(
                references
                    .iter()
                    .map(|reference| self.graceful_shutdown_ref(reference, max_wait)),
            )
            .await;
            self.actors.clear();
            outcomes.into_iter().filter(|drained| *drained).count()
        }
        .boxed()
    }
}
