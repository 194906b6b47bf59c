use std::sync::Arc;

use parking_lot::RwLock;
use pitkit_model::BuildUnitTree;

use crate::{build_hierarchy, scan_build_descriptors, SourceFolderCatalog, WorkspaceModel};

/// Session-scoped owner of the current build-unit tree.
///
/// A rescan builds a fresh tree and swaps it in, so readers holding a
/// [`BuildUnitStore::snapshot`] see either the old or the new tree in full.
#[derive(Debug, Default)]
pub struct BuildUnitStore {
    current: RwLock<Arc<BuildUnitTree>>,
}

impl BuildUnitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<BuildUnitTree> {
        Arc::clone(&self.current.read())
    }

    /// Discards the previous tree and rescans the whole workspace.
    ///
    /// The workspace read guard is held for the duration of the scan.
    pub fn clean_scan(
        &self,
        workspace: &dyn WorkspaceModel,
        catalog: &SourceFolderCatalog,
    ) -> Arc<BuildUnitTree> {
        let tree = {
            let _read = workspace.read_guard();
            build_hierarchy(scan_build_descriptors(workspace, catalog))
        };

        if tree.is_empty() {
            tracing::info!(target: "pitkit.project", "no build descriptors found");
        } else {
            tracing::info!(
                target: "pitkit.project",
                units = tree.len(),
                "scanned build units"
            );
        }
        self.replace(tree)
    }

    pub fn replace(&self, tree: BuildUnitTree) -> Arc<BuildUnitTree> {
        let tree = Arc::new(tree);
        *self.current.write() = Arc::clone(&tree);
        tree
    }
}
