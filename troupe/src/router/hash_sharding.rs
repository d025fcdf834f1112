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

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::traits::{Reference, RoutingStrategy};

type KeyFn<M> = Box<dyn Fn(&M) -> i64 + Send + Sync>;

/// Routes by message hash: the routee index is `|hash| % pool.len()`.
///
/// This is plain modulo sharding, not a hash ring. A given hash always lands on the same index
/// for a fixed pool size, and changing the pool size remaps most hashes.
pub struct HashSharding<M> {
    key: KeyFn<M>,
}

impl<M: 'static> HashSharding<M> {
    /// Shards by the value returned from `key`.
    pub fn new<F>(key: F) -> Self
    where
        F: Fn(&M) -> i64 + Send + Sync + 'static,
    {
        Self { key: Box::new(key) }
    }

    /// Shards by the message's own `Hash` implementation.
    pub fn hashed() -> Self
    where
        M: Hash,
    {
        Self::new(|message: &M| {
            let mut hasher = DefaultHasher::new();
            message.hash(&mut hasher);
            hasher.finish() as i64
        })
    }

    /// The index a hash maps to in a pool of `pool_len` routees.
    pub fn index_for(hash: i64, pool_len: usize) -> Option<usize> {
        if pool_len == 0 {
            return None;
        }
        Some((hash.unsigned_abs() % pool_len as u64) as usize)
    }
}

impl<M: 'static> RoutingStrategy<M> for HashSharding<M> {
    fn select<R: Reference>(&mut self, message: &M, pool: &[R]) -> Option<usize> {
        Self::index_for((self.key)(message), pool.len())
    }
}

impl<M> fmt::Debug for HashSharding<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashSharding").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_uses_absolute_value_modulo_pool() {
        assert_eq!(HashSharding::<u8>::index_for(7, 5), Some(2));
        assert_eq!(HashSharding::<u8>::index_for(-7, 5), Some(2));
        assert_eq!(HashSharding::<u8>::index_for(i64::MIN, 2), Some(0));
        assert_eq!(HashSharding::<u8>::index_for(3, 0), None);
    }

    #[test]
    fn resizing_the_pool_remaps_keys() {
        let before: Vec<_> = (0..12)
            .map(|hash| HashSharding::<u8>::index_for(hash, 4))
            .collect();
        let after: Vec<_> = (0..12)
            .map(|hash| HashSharding::<u8>::index_for(hash, 5))
            .collect();
        assert_ne!(before, after);
        assert_eq!(before[5], Some(1));
        assert_eq!(after[5], Some(0));
    }
}
