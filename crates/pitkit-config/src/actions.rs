use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Project-relative location of persisted pre/post actions.
pub const ACTIONS_FILE: &str = ".pitkit/actions.toml";

/// Free-text build steps run before and after the mutation-coverage goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSettings {
    #[serde(default)]
    pub pre_actions: String,
    #[serde(default)]
    pub post_actions: String,
}

/// Persists [`ActionSettings`] per project.
pub trait ActionStore {
    fn load(&self, project_root: &Path) -> Result<ActionSettings, ConfigError>;

    fn save(&self, project_root: &Path, settings: &ActionSettings) -> Result<(), ConfigError>;
}

/// Stores actions as TOML in [`ACTIONS_FILE`] under the project root.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlActionStore;

impl TomlActionStore {
    pub fn path_for(project_root: &Path) -> PathBuf {
        project_root.join(ACTIONS_FILE)
    }
}

impl ActionStore for TomlActionStore {
    fn load(&self, project_root: &Path) -> Result<ActionSettings, ConfigError> {
        let path = Self::path_for(project_root);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ActionSettings::default())
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Ok(toml::from_str(&text)?)
    }

    fn save(&self, project_root: &Path, settings: &ActionSettings) -> Result<(), ConfigError> {
        let path = Self::path_for(project_root);
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string(settings)?;
        std::fs::write(&path, text).map_err(io_err)?;

        tracing::debug!(target: "pitkit.config", path = %path.display(), "saved actions");
        Ok(())
    }
}
