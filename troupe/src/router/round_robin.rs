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

use crate::traits::{Reference, RoutingStrategy};

/// Implements a round-robin routing strategy.
///
/// The first message goes to the first routee, then the position advances by one and wraps at
/// the pool length, so `k * n` messages over `n` routees give each routee exactly `k`.
#[derive(Debug, Default, Clone)]
pub struct RoundRobin {
    /// Index of the routee that receives the next message.
    position: usize,
}

impl RoundRobin {
    /// Creates a strategy that starts at the first routee.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> RoutingStrategy<M> for RoundRobin {
    fn select<R: Reference>(&mut self, _message: &M, pool: &[R]) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }
        // The pool length may differ from the last call only if a caller reuses the strategy.
        let index = self.position % pool.len();
        self.position = (index + 1) % pool.len();
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::actor::{ActorRef, Context};
    use crate::common::{ActorSystem, TroupeConfig};
    use crate::traits::Actor;

    #[derive(Default)]
    struct Silent;

    #[async_trait]
    impl Actor for Silent {
        type Message = ();

        async fn receive(&mut self, _message: (), _ctx: &mut Context) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn pool(system: &ActorSystem, size: usize) -> Vec<ActorRef<()>> {
        (0..size)
            .map(|_| system.spawn::<Silent>(None).expect("unnamed spawn cannot collide"))
            .collect()
    }

    #[tokio::test]
    async fn starts_at_the_first_routee_and_wraps() {
        let system = ActorSystem::with_config(TroupeConfig::default());
        let pool = pool(&system, 3);
        let mut strategy = RoundRobin::new();

        let picks: Vec<_> = (0..7).filter_map(|_| strategy.select(&(), &pool)).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[tokio::test]
    async fn empty_pool_selects_nothing() {
        let system = ActorSystem::with_config(TroupeConfig::default());
        let pool = pool(&system, 0);
        let mut strategy = RoundRobin::new();

        assert_eq!(strategy.select(&(), &pool), None);
    }

    #[tokio::test]
    async fn shrinking_pool_never_goes_out_of_range() {
        let system = ActorSystem::with_config(TroupeConfig::default());
        let pool = pool(&system, 4);
        let mut strategy = RoundRobin::new();

        for _ in 0..3 {
            strategy.select(&(), &pool);
        }
        assert_eq!(strategy.select(&(), &pool[..2]), Some(1));
        assert_eq!(strategy.select(&(), &pool[..2]), Some(0));
    }
}
