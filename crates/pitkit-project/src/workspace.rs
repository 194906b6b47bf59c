use std::path::{Path, PathBuf};

use pitkit_model::ReadGuard;

/// Opaque handle to an IDE module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceRootKind {
    /// Compiled sources (Java/Kotlin).
    Source,
    /// Resource roots; never treated as source folders.
    Resources,
}

/// A source root as reported by the workspace model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRootEntry {
    pub path: PathBuf,
    pub kind: SourceRootKind,
    pub is_test: bool,
    /// The workspace model marks this root as build output.
    pub is_generated: bool,
}

impl SourceRootEntry {
    pub fn source(path: impl Into<PathBuf>, is_test: bool) -> Self {
        Self {
            path: path.into(),
            kind: SourceRootKind::Source,
            is_test,
            is_generated: false,
        }
    }
}

/// Read-only view of the IDE's project model.
///
/// Implementations must return a consistent view for as long as a guard from
/// [`WorkspaceModel::read_guard`] is alive.
pub trait WorkspaceModel {
    fn modules(&self) -> Vec<ModuleId>;

    fn content_roots(&self, module: ModuleId) -> Vec<PathBuf>;

    /// Existence check for a file directly inside `dir`.
    fn find_child_file(&self, dir: &Path, name: &str) -> Option<PathBuf>;

    fn source_roots(&self, module: ModuleId) -> Vec<SourceRootEntry>;

    fn read_guard(&self) -> ReadGuard<'_> {
        ReadGuard::noop()
    }
}
