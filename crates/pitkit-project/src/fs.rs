use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use pitkit_model::BuildSystem;
use walkdir::{DirEntry, WalkDir};

use crate::{ModuleId, ProjectError, SourceRootEntry, SourceRootKind, WorkspaceModel};

/// Directory names never descended into while looking for descriptors.
const SKIPPED_DIRS: [&str; 7] = [
    ".git",
    ".gradle",
    ".idea",
    ".pitkit",
    "build",
    "target",
    "node_modules",
];

struct ConventionalRoot {
    relative: &'static str,
    kind: SourceRootKind,
    is_test: bool,
    is_generated: bool,
}

const fn root(
    relative: &'static str,
    kind: SourceRootKind,
    is_test: bool,
    is_generated: bool,
) -> ConventionalRoot {
    ConventionalRoot {
        relative,
        kind,
        is_test,
        is_generated,
    }
}

const CONVENTIONAL_ROOTS: &[ConventionalRoot] = &[
    root("src/main/java", SourceRootKind::Source, false, false),
    root("src/main/kotlin", SourceRootKind::Source, false, false),
    root("src/test/java", SourceRootKind::Source, true, false),
    root("src/test/kotlin", SourceRootKind::Source, true, false),
    root("src/androidTest/java", SourceRootKind::Source, true, false),
    root("src/androidTest/kotlin", SourceRootKind::Source, true, false),
    root("src/main/resources", SourceRootKind::Resources, false, false),
    root("src/test/resources", SourceRootKind::Resources, true, false),
    root("target/generated-sources/annotations", SourceRootKind::Source, false, true),
    root("target/generated-test-sources/test-annotations", SourceRootKind::Source, true, true),
    root("build/generated/sources/annotationProcessor/java/main", SourceRootKind::Source, false, true),
    root("build/generated/sources/annotationProcessor/java/test", SourceRootKind::Source, true, true),
];

#[derive(Debug, Clone)]
struct FsModule {
    dir: PathBuf,
    source_roots: Vec<SourceRootEntry>,
}

/// Workspace model backed by the on-disk layout of Maven/Gradle projects.
///
/// Every directory holding a build descriptor becomes one module whose only
/// content root is that directory.
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
    modules: Vec<FsModule>,
}

impl FsWorkspace {
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, ProjectError> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).map_err(|source| ProjectError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ProjectError::NotADirectory { root });
        }

        let mut module_dirs = BTreeSet::new();
        let walker = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));
        for entry in walker {
            let entry = entry.map_err(|source| ProjectError::Walk {
                root: root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_descriptor = entry
                .file_name()
                .to_str()
                .and_then(BuildSystem::from_descriptor_name)
                .is_some();
            if let (true, Some(dir)) = (is_descriptor, entry.path().parent()) {
                module_dirs.insert(dir.to_path_buf());
            }
        }

        let modules: Vec<FsModule> = module_dirs
            .into_iter()
            .map(|dir| FsModule {
                source_roots: conventional_roots(&dir),
                dir,
            })
            .collect();

        tracing::debug!(
            target: "pitkit.project",
            root = %root.display(),
            modules = modules.len(),
            "discovered filesystem workspace"
        );

        Ok(Self { root, modules })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn module(&self, module: ModuleId) -> Option<&FsModule> {
        self.modules.get(module.0 as usize)
    }
}

impl WorkspaceModel for FsWorkspace {
    fn modules(&self) -> Vec<ModuleId> {
        (0..self.modules.len())
            .filter_map(|idx| u32::try_from(idx).ok())
            .map(ModuleId)
            .collect()
    }

    fn content_roots(&self, module: ModuleId) -> Vec<PathBuf> {
        self.module(module)
            .map(|module| vec![module.dir.clone()])
            .unwrap_or_default()
    }

    fn find_child_file(&self, dir: &Path, name: &str) -> Option<PathBuf> {
        let path = dir.join(name);
        path.is_file().then_some(path)
    }

    fn source_roots(&self, module: ModuleId) -> Vec<SourceRootEntry> {
        self.module(module)
            .map(|module| module.source_roots.clone())
            .unwrap_or_default()
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn conventional_roots(dir: &Path) -> Vec<SourceRootEntry> {
    CONVENTIONAL_ROOTS
        .iter()
        .map(|conventional| (dir.join(conventional.relative), conventional))
        .filter(|(path, _)| path.is_dir())
        .map(|(path, conventional)| SourceRootEntry {
            path,
            kind: conventional.kind,
            is_test: conventional.is_test,
            is_generated: conventional.is_generated,
        })
        .collect()
}
