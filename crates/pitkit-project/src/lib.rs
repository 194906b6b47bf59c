//! Build-unit discovery for pitkit.
//!
//! This crate turns the IDE's module/content-root/source-root model into a
//! [`BuildUnitTree`](pitkit_model::BuildUnitTree):
//! - classify source roots (production vs test, generated vs hand-written)
//! - locate `pom.xml` / `build.gradle(.kts)` descriptors per content root
//! - rebuild the module hierarchy from directory containment

mod catalog;
mod fs;
mod hierarchy;
mod scan;
mod store;
mod workspace;

pub use catalog::{FolderClass, SourceFolderCatalog};
pub use fs::FsWorkspace;
pub use hierarchy::build_hierarchy;
pub use scan::{scan_build_descriptors, BuildDescriptor};
pub use store::BuildUnitStore;
pub use workspace::{ModuleId, SourceRootEntry, SourceRootKind, WorkspaceModel};

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{root} is not a directory")]
    NotADirectory { root: PathBuf },
}
