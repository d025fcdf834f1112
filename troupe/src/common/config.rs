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

use std::path::Path;
use std::time::Duration;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Configuration for a Troupe actor system.
///
/// Loaded from TOML in the XDG config directory. Every field has a default, so a file only
/// needs the values it changes:
///
/// ```toml
/// [timeouts]
/// graceful_shutdown_ms = 2500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TroupeConfig {
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Default values configuration
    pub defaults: DefaultsConfig,
}

/// Timeout-related configuration values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-actor deadline used by `ActorSystem::shutdown_all`, in milliseconds
    pub graceful_shutdown_ms: u64,
    /// Upper bound for `ActorSystem::wait`, in milliseconds
    pub system_wait_ms: u64,
    /// How often `ActorSystem::wait` polls the registries, in milliseconds
    pub wait_poll_interval_ms: u64,
}

/// Default values configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Name of the sentinel actor used as the sender of anonymous messages
    pub nobody_name: String,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            graceful_shutdown_ms: 10_000,
            system_wait_ms: 10_000,
            wait_poll_interval_ms: 10,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            nobody_name: "nobody".to_string(),
        }
    }
}

impl TroupeConfig {
    /// Deadline for each actor during a system-wide graceful shutdown
    pub const fn graceful_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.graceful_shutdown_ms)
    }

    /// Upper bound for a system-wide drain wait
    pub const fn system_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.system_wait_ms)
    }

    /// Poll interval of a system-wide drain wait. Never zero.
    pub fn wait_poll_interval(&self) -> Duration {
        Duration::from_millis(self.timeouts.wait_poll_interval_ms.max(1))
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads configuration from `$XDG_CONFIG_HOME/troupe/config.toml`.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file is logged and also
    /// yields the defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("troupe") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        match xdg_dirs.find_config_file("config.toml") {
            Some(path) => Self::load_from(&path),
            None => {
                info!("No configuration file found, using defaults");
                Self::default()
            }
        }
    }

    /// Loads configuration from an explicit path, falling back to the defaults on failure.
    pub fn load_from(path: &Path) -> Self {
        use tracing::{error, info};

        info!("Loading configuration from: {}", path.display());
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_toml(&text) {
                Ok(config) => config,
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: TroupeConfig = TroupeConfig::load();
}
