use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    Maven,
    Gradle,
}

impl BuildSystem {
    /// Build descriptor file names, in the order a content root is probed.
    ///
    /// When a directory has both Gradle scripts, `build.gradle.kts` is the
    /// recorded descriptor.
    pub const DESCRIPTOR_PROBE_ORDER: [(&'static str, BuildSystem); 3] = [
        ("pom.xml", BuildSystem::Maven),
        ("build.gradle.kts", BuildSystem::Gradle),
        ("build.gradle", BuildSystem::Gradle),
    ];

    pub fn from_descriptor_name(file_name: &str) -> Option<Self> {
        Self::DESCRIPTOR_PROBE_ORDER
            .iter()
            .find(|(name, _)| *name == file_name)
            .map(|(_, system)| *system)
    }

    /// Default executable used when no project wrapper is present.
    pub fn executable(self) -> &'static str {
        match self {
            BuildSystem::Maven => "mvn",
            BuildSystem::Gradle => "gradle",
        }
    }

    /// Project wrapper script name (`./mvnw`, `./gradlew`).
    pub fn wrapper(self) -> &'static str {
        match self {
            BuildSystem::Maven => "mvnw",
            BuildSystem::Gradle => "gradlew",
        }
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildSystem::Maven => f.write_str("Maven"),
            BuildSystem::Gradle => f.write_str("Gradle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeType {
    Production,
    Test,
}

impl CodeType {
    pub fn opposite(self) -> Self {
        match self {
            CodeType::Production => CodeType::Test,
            CodeType::Test => CodeType::Production,
        }
    }

    /// Lower-case label used in user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            CodeType::Production => "production",
            CodeType::Test => "test",
        }
    }
}

/// Index of a [`BuildUnit`] inside the [`crate::BuildUnitTree`] that produced it.
///
/// Ids are only meaningful for the tree they came from; a rescan produces a
/// new tree with fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildUnitId(u32);

impl BuildUnitId {
    pub fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index).unwrap_or(u32::MAX);
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A production or test source root owned by exactly one build unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceFolder {
    pub path: PathBuf,
    pub code_type: CodeType,
    /// Owning build unit.
    pub unit: BuildUnitId,
}

/// One Maven/Gradle project or module, anchored by its build descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildUnit {
    pub id: BuildUnitId,
    /// Name of the directory holding the descriptor (e.g. `app`).
    pub name: String,
    pub build_system: BuildSystem,
    /// Absolute path to `pom.xml` / `build.gradle` / `build.gradle.kts`.
    pub descriptor_path: PathBuf,
    /// Source folders owned directly by this unit (never under a child unit).
    pub source_folders: Vec<SourceFolder>,
    pub children: Vec<BuildUnitId>,
    pub parent: Option<BuildUnitId>,
}

impl BuildUnit {
    pub fn directory(&self) -> &Path {
        self.descriptor_path
            .parent()
            .unwrap_or(self.descriptor_path.as_path())
    }

    pub fn descriptor_file_name(&self) -> &str {
        self.descriptor_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Number of path components in the unit directory.
    pub fn depth(&self) -> usize {
        self.directory().components().count()
    }

    /// First owned source folder of the given code type.
    pub fn source_folder(&self, code_type: CodeType) -> Option<&SourceFolder> {
        self.source_folders
            .iter()
            .find(|folder| folder.code_type == code_type)
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
