use std::path::{Path, PathBuf};

use pitkit_model::{names, BuildUnitTree, CodeElement, CodePackage, CodeType, SourceFolder};

use crate::adapters::LanguageAdapters;
use crate::syntax::SyntaxIndex;

/// Elements resolved from a selection plus one message per path that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub elements: Vec<CodeElement>,
    pub errors: Vec<String>,
}

/// Maps selected filesystem paths to code elements.
pub struct CodeElementResolver<'a> {
    tree: &'a BuildUnitTree,
    index: &'a dyn SyntaxIndex,
    adapters: &'a LanguageAdapters,
}

impl<'a> CodeElementResolver<'a> {
    pub fn new(
        tree: &'a BuildUnitTree,
        index: &'a dyn SyntaxIndex,
        adapters: &'a LanguageAdapters,
    ) -> Self {
        Self {
            tree,
            index,
            adapters,
        }
    }

    /// Resolves every path independently; failures never abort the batch.
    pub fn resolve(&self, paths: &[PathBuf]) -> Resolution {
        let mut resolution = Resolution::default();
        for path in paths {
            match self.resolve_one(path) {
                Ok(element) => {
                    tracing::trace!(
                        target: "pitkit.resolve",
                        path = %path.display(),
                        element = element.qualified_name(),
                        "resolved selection"
                    );
                    resolution.elements.push(element);
                }
                Err(message) => {
                    tracing::debug!(target: "pitkit.resolve", %message, "unresolved selection");
                    resolution.errors.push(message);
                }
            }
        }
        resolution
    }

    fn resolve_one(&self, path: &Path) -> Result<CodeElement, String> {
        if let Some(unit) = self.tree.unit_by_directory(path) {
            let folder = unit.source_folder(CodeType::Production).ok_or_else(|| {
                format!("Node {}: No production source folder found", path.display())
            })?;
            return self.base_package(folder).map(CodeElement::Package);
        }

        if let Some(folder) = self.tree.source_folder_at(path) {
            return self.base_package(folder).map(CodeElement::Package);
        }

        let folder = self
            .tree
            .source_folder_containing(path)
            .ok_or_else(|| format!("Node {}: source folder not found", path.display()))?;

        let node = self
            .index
            .node_at(path)
            .ok_or_else(|| format!("Node {}: syntax node not found", path.display()))?;

        self.adapters
            .try_resolve(self.index, &node, folder)
            .ok_or_else(|| {
                format!(
                    "Unrecognized node {}: not a supported source file or package",
                    path.display()
                )
            })
    }

    /// Root package of a source folder, skipping single-child wrapper dirs
    /// (`com/myproject` rather than `com`).
    fn base_package(&self, folder: &SourceFolder) -> Result<CodePackage, String> {
        let mut node = self
            .index
            .node_at(&folder.path)
            .filter(|node| node.is_dir())
            .ok_or_else(|| format!("Node {}: syntax node not found", folder.path.display()))?;

        loop {
            let children = self.index.children(&node);
            match children.as_slice() {
                [only] if only.is_dir() => node = only.clone(),
                _ => break,
            }
        }

        let qualified_name = node
            .path
            .strip_prefix(&folder.path)
            .map(names::package_from_relative_dir)
            .unwrap_or_default();
        if qualified_name.is_empty() {
            return Err(format!(
                "Node {}: Unable to determine base package",
                folder.path.display()
            ));
        }

        Ok(CodePackage {
            path: node.path,
            qualified_name,
            source_folder: folder.clone(),
        })
    }
}
