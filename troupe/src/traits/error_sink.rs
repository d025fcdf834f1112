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

/// Receives failures caught at the runner boundary.
///
/// Reports are delivered from the drain loop of the failing actor, so implementations should
/// return quickly.
pub trait ErrorSink: Send + Sync + 'static {
    /// Records one caught failure.
    fn report(&self, report: &ErrorReport);
}

/// How an actor invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `receive` returned an error.
    Failed,
    /// `receive` panicked.
    Panicked,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Failed => f.write_str("failed"),
            ErrorKind::Panicked => f.write_str("panicked"),
        }
    }
}

/// One caught failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Name of the actor whose invocation failed.
    pub actor_name: String,
    /// Returned error or panic.
    pub error_kind: ErrorKind,
    /// The error's display form, or the panic message.
    pub message: String,
    /// The error's debug form with its cause chain. Empty for panics.
    pub trace: String,
}
