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

use crate::actor::SpawnContext;

/// Builds actor instances from constructor arguments.
///
/// The system calls the factory once per successful spawn, with the name already reserved.
/// Host applications plug their own construction here (a dependency container, a pool of
/// preconfigured clients); closures of the right shape implement it directly:
///
/// ```rust,ignore
/// let greeter = system.spawn_with(
///     Some("greeter"),
///     &|ctx: &mut SpawnContext, greeting: String| {
///         ctx.on_shutdown(|| tracing::info!("greeter stopped"));
///         Ok(Greeter { greeting })
///     },
///     "hello".to_string(),
/// )?;
/// ```
pub trait ActorFactory<A, Args>: Send + Sync {
    /// Produces the actor instance.
    fn construct(&self, ctx: &mut SpawnContext, args: Args) -> anyhow::Result<A>;
}

impl<A, Args, F> ActorFactory<A, Args> for F
where
    F: Fn(&mut SpawnContext, Args) -> anyhow::Result<A> + Send + Sync,
{
    fn construct(&self, ctx: &mut SpawnContext, args: Args) -> anyhow::Result<A> {
        self(ctx, args)
    }
}

/// Builds actors through their `Default` implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl<A: Default> ActorFactory<A, ()> for DefaultFactory {
    fn construct(&self, _ctx: &mut SpawnContext, _args: ()) -> anyhow::Result<A> {
        Ok(A::default())
    }
}
