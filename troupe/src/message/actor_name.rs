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

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

/// The logical, case-insensitive name of an actor.
///
/// Two names that differ only in letter case are the same name: equality, hashing and
/// registry lookups all use the lowercase form, while `Display` keeps the spelling that was
/// supplied at spawn time. A name is unique within one actor type of one [`ActorSystem`].
///
/// [`ActorSystem`]: crate::ActorSystem
#[derive(Clone)]
pub struct ActorName {
    display: Arc<str>,
    key: Arc<str>,
}

impl ActorName {
    /// Creates a name from user input.
    pub fn new(name: impl AsRef<str>) -> Self {
        let display: Arc<str> = Arc::from(name.as_ref());
        let key: Arc<str> = Arc::from(name.as_ref().to_lowercase());
        Self { display, key }
    }

    /// Creates an opaque unique name for actors spawned without one.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().simple().to_string())
    }

    /// The name as it was supplied.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The normalized (lowercase) form used as the registry key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for ActorName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ActorName {}

impl Hash for ActorName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for ActorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl fmt::Debug for ActorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorName({:?})", &*self.display)
    }
}

impl From<&str> for ActorName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ActorName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one runner.
///
/// Unlike [`ActorName`], which is only unique within a registry, an `ActorId` never repeats
/// inside a process, so it keys timer ownership and reference equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

impl ActorId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
