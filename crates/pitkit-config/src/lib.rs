//! Configuration for pitkit.
//!
//! Configuration is TOML, discovered per project root (see
//! [`discover_config_path`]). Every section is optional; a missing file yields
//! [`PitkitConfig::default`].
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [generated_sources]
//! markers = ["apt-out"]
//!
//! [maven]
//! compile_tests_first = true
//!
//! [build]
//! timeout_ms = 600000
//! ```

mod actions;
mod logging;

pub use actions::{ActionSettings, ActionStore, TomlActionStore, ACTIONS_FILE};
pub use logging::{init_tracing, LoggingConfig};

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use parking_lot::ReentrantMutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding config discovery.
pub const PITKIT_CONFIG_ENV_VAR: &str = "PITKIT_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitkitConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extra markers for generated source folders.
    #[serde(default)]
    pub generated_sources: GeneratedSourcesConfig,

    #[serde(default)]
    pub maven: MavenConfig,

    #[serde(default)]
    pub gradle: GradleConfig,

    /// Limits applied when running the build tool.
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSourcesConfig {
    /// Path segments (exact match) that mark a source root as generated.
    #[serde(default)]
    pub markers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MavenConfig {
    /// Run `test-compile` before `pitest:mutationCoverage`.
    #[serde(default)]
    pub compile_tests_first: bool,

    /// Use `./mvnw` when the project ships one.
    #[serde(default = "default_true")]
    pub prefer_wrapper: bool,
}

impl Default for MavenConfig {
    fn default() -> Self {
        Self {
            compile_tests_first: false,
            prefer_wrapper: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradleConfig {
    /// Use `./gradlew` when the project ships one.
    #[serde(default = "default_true")]
    pub prefer_wrapper: bool,
}

impl Default for GradleConfig {
    fn default() -> Self {
        Self {
            prefer_wrapper: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Kill the build tool after this many milliseconds. Unset means no limit.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl BuildConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("failed to serialize toml: {0}")]
    Serialize(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.message().to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err.to_string())
    }
}

impl PitkitConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

static CONFIG_ENV_LOCK: OnceLock<ReentrantMutex<()>> = OnceLock::new();

fn config_env_lock() -> &'static ReentrantMutex<()> {
    CONFIG_ENV_LOCK.get_or_init(|| ReentrantMutex::new(()))
}

/// Serializes access to [`PITKIT_CONFIG_ENV_VAR`].
///
/// Tests that set the variable should hold this lock for their whole body so
/// concurrent discovery does not observe it.
pub fn with_config_env_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = config_env_lock().lock();
    f()
}

/// Finds the config file for a project.
///
/// Search order:
/// 1) `PITKIT_CONFIG_PATH` (absolute, or relative to `project_root`)
/// 2) `pitkit.toml`
/// 3) `.pitkit.toml`
/// 4) `.pitkit/config.toml`
pub fn discover_config_path(project_root: &Path) -> Option<PathBuf> {
    let _guard = config_env_lock().lock();
    if let Some(value) = std::env::var_os(PITKIT_CONFIG_ENV_VAR) {
        let candidate = PathBuf::from(value);
        let path = if candidate.is_absolute() {
            candidate
        } else {
            project_root.join(candidate)
        };
        return Some(path.canonicalize().unwrap_or(path));
    }

    ["pitkit.toml", ".pitkit.toml", ".pitkit/config.toml"]
        .into_iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
        .map(|path| path.canonicalize().unwrap_or(path))
}

/// Loads the configuration for a project root.
///
/// If no config is present, returns [`PitkitConfig::default`] and `None`.
pub fn load_for_workspace(
    project_root: &Path,
) -> Result<(PitkitConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = discover_config_path(project_root) else {
        return Ok((PitkitConfig::default(), None));
    };

    let config = PitkitConfig::load_from_path(&path)?;
    tracing::debug!(target: "pitkit.config", path = %path.display(), "loaded config");
    Ok((config, Some(path)))
}
