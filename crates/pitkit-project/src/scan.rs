use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pitkit_model::{BuildSystem, CodeType};

use crate::{ModuleId, SourceFolderCatalog, WorkspaceModel};

/// One discovered build descriptor together with the source folders it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescriptor {
    pub build_system: BuildSystem,
    pub descriptor_path: PathBuf,
    /// Hand-written source folders under this descriptor's directory and under
    /// no nested descriptor's directory.
    pub source_folders: Vec<(PathBuf, CodeType)>,
}

impl BuildDescriptor {
    pub fn directory(&self) -> &Path {
        self.descriptor_path
            .parent()
            .unwrap_or(self.descriptor_path.as_path())
    }

    pub fn depth(&self) -> usize {
        self.directory().components().count()
    }
}

struct Located {
    build_system: BuildSystem,
    descriptor_path: PathBuf,
    module: ModuleId,
}

/// Probes every content root of every module for a build descriptor.
///
/// Output is ordered by descriptor directory. The caller is expected to hold
/// the workspace read guard.
pub fn scan_build_descriptors(
    workspace: &dyn WorkspaceModel,
    catalog: &SourceFolderCatalog,
) -> Vec<BuildDescriptor> {
    let mut located: BTreeMap<PathBuf, Located> = BTreeMap::new();

    for module in workspace.modules() {
        for content_root in workspace.content_roots(module) {
            if located.contains_key(&content_root) {
                continue;
            }
            let Some((descriptor_path, build_system)) = probe_descriptor(workspace, &content_root)
            else {
                continue;
            };
            tracing::debug!(
                target: "pitkit.project",
                descriptor = %descriptor_path.display(),
                build_system = %build_system,
                "found build descriptor"
            );
            located.insert(
                content_root,
                Located {
                    build_system,
                    descriptor_path,
                    module,
                },
            );
        }
    }

    let directories: Vec<PathBuf> = located.keys().cloned().collect();

    located
        .into_iter()
        .map(|(dir, found)| {
            let nested: Vec<&PathBuf> = directories
                .iter()
                .filter(|other| **other != dir && other.starts_with(&dir))
                .collect();

            let mut source_folders: Vec<(PathBuf, CodeType)> = Vec::new();
            for entry in workspace.source_roots(found.module) {
                let Some(code_type) = catalog.accepts(&entry) else {
                    continue;
                };
                if !entry.path.starts_with(&dir)
                    || nested.iter().any(|child| entry.path.starts_with(child))
                {
                    continue;
                }
                if source_folders.iter().any(|(path, _)| *path == entry.path) {
                    continue;
                }
                source_folders.push((entry.path, code_type));
            }

            BuildDescriptor {
                build_system: found.build_system,
                descriptor_path: found.descriptor_path,
                source_folders,
            }
        })
        .collect()
}

fn probe_descriptor(
    workspace: &dyn WorkspaceModel,
    dir: &Path,
) -> Option<(PathBuf, BuildSystem)> {
    BuildSystem::DESCRIPTOR_PROBE_ORDER
        .iter()
        .find_map(|(name, system)| {
            workspace
                .find_child_file(dir, name)
                .map(|path| (path, *system))
        })
}
