use std::collections::HashMap;
use std::ops::Index;
use std::path::{Path, PathBuf};

use crate::{BuildUnit, BuildUnitId, CodeType, SourceFolder};

/// Immutable arena of build units produced by one project scan.
///
/// Parent/child links are [`BuildUnitId`]s into the arena. Lookup tables for
/// unit directories and source-folder paths are computed once on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildUnitTree {
    units: Vec<BuildUnit>,
    roots: Vec<BuildUnitId>,
    by_directory: HashMap<PathBuf, BuildUnitId>,
    folders: HashMap<PathBuf, (BuildUnitId, usize)>,
}

impl BuildUnitTree {
    /// Wraps already-linked units.
    ///
    /// `units[i].id` must be `i`; roots are the units without a parent, in
    /// arena order. When two units claim the same source folder the first one
    /// wins.
    pub fn from_units(units: Vec<BuildUnit>) -> Self {
        debug_assert!(units
            .iter()
            .enumerate()
            .all(|(idx, unit)| unit.id.index() == idx));

        let roots = units
            .iter()
            .filter(|unit| unit.parent.is_none())
            .map(|unit| unit.id)
            .collect();

        let mut by_directory = HashMap::with_capacity(units.len());
        let mut folders = HashMap::new();
        for unit in &units {
            by_directory
                .entry(unit.directory().to_path_buf())
                .or_insert(unit.id);
            for (idx, folder) in unit.source_folders.iter().enumerate() {
                folders.entry(folder.path.clone()).or_insert((unit.id, idx));
            }
        }

        Self {
            units,
            roots,
            by_directory,
            folders,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildUnit> {
        self.units.iter()
    }

    pub fn roots(&self) -> impl Iterator<Item = &BuildUnit> {
        self.roots.iter().map(|id| &self.units[id.index()])
    }

    pub fn get(&self, id: BuildUnitId) -> Option<&BuildUnit> {
        self.units.get(id.index())
    }

    pub fn parent(&self, id: BuildUnitId) -> Option<&BuildUnit> {
        self.get(id)?.parent.and_then(|parent| self.get(parent))
    }

    pub fn children(&self, id: BuildUnitId) -> impl Iterator<Item = &BuildUnit> {
        self.get(id)
            .map(|unit| unit.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|child| self.get(*child))
    }

    /// Walks from `id`'s parent up to its root.
    pub fn ancestors(&self, id: BuildUnitId) -> impl Iterator<Item = &BuildUnit> {
        std::iter::successors(self.parent(id), |unit| self.parent(unit.id))
    }

    pub fn root_of(&self, id: BuildUnitId) -> Option<&BuildUnit> {
        self.ancestors(id).last().or_else(|| self.get(id))
    }

    /// Unit whose descriptor sits directly in `dir`.
    pub fn unit_by_directory(&self, dir: &Path) -> Option<&BuildUnit> {
        self.by_directory.get(dir).and_then(|id| self.get(*id))
    }

    /// Source folder registered at exactly `path`.
    pub fn source_folder_at(&self, path: &Path) -> Option<&SourceFolder> {
        let (unit, idx) = self.folders.get(path)?;
        self.get(*unit)?.source_folders.get(*idx)
    }

    /// Innermost registered source folder that contains `path` (or is `path`).
    pub fn source_folder_containing(&self, path: &Path) -> Option<&SourceFolder> {
        path.ancestors()
            .find_map(|candidate| self.source_folder_at(candidate))
    }

    pub fn unit_of(&self, folder: &SourceFolder) -> Option<&BuildUnit> {
        self.get(folder.unit)
    }

    /// Source folder of `code_type` in the same unit as `folder`.
    pub fn sibling_folder(&self, folder: &SourceFolder, code_type: CodeType) -> Option<&SourceFolder> {
        self.unit_of(folder)?.source_folder(code_type)
    }

    /// Gradle project path of a unit (`:` for a root, `:lib:core` below it).
    pub fn gradle_project_path(&self, id: BuildUnitId) -> String {
        let Some(unit) = self.get(id) else {
            return ":".to_string();
        };
        if unit.is_root() {
            return ":".to_string();
        }

        let mut segments: Vec<&str> = self
            .ancestors(id)
            .filter(|ancestor| !ancestor.is_root())
            .map(|ancestor| ancestor.name.as_str())
            .collect();
        segments.reverse();
        segments.push(unit.name.as_str());

        let mut path = String::new();
        for segment in segments {
            path.push(':');
            path.push_str(segment);
        }
        path
    }
}

impl Index<BuildUnitId> for BuildUnitTree {
    type Output = BuildUnit;

    fn index(&self, id: BuildUnitId) -> &Self::Output {
        &self.units[id.index()]
    }
}
