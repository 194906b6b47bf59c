use std::path::Path;

use pitkit_model::{BuildUnit, BuildUnitId, BuildUnitTree, SourceFolder};

use crate::BuildDescriptor;

/// Rebuilds the module hierarchy from a flat descriptor list.
///
/// Descriptors are ordered deepest-first, so every unit's children sit at
/// lower arena indices than the unit itself. The parent map is computed in a
/// first pass and units are materialized in a second; nothing is mutated
/// after construction. Source-folder ownership is taken as supplied.
pub fn build_hierarchy(descriptors: Vec<BuildDescriptor>) -> BuildUnitTree {
    if descriptors.is_empty() {
        return BuildUnitTree::default();
    }

    let mut sorted = descriptors;
    sorted.sort_by(|a, b| {
        b.depth()
            .cmp(&a.depth())
            .then_with(|| a.descriptor_path.cmp(&b.descriptor_path))
    });

    let parents: Vec<Option<usize>> = (0..sorted.len())
        .map(|idx| immediate_parent(&sorted, idx))
        .collect();

    let mut children: Vec<Vec<BuildUnitId>> = vec![Vec::new(); sorted.len()];
    for (child, parent) in parents.iter().enumerate() {
        if let Some(parent) = parent {
            children[*parent].push(BuildUnitId::from_index(child));
        }
    }

    let units = sorted
        .into_iter()
        .zip(parents)
        .zip(children)
        .enumerate()
        .map(|(idx, ((descriptor, parent), children))| {
            let id = BuildUnitId::from_index(idx);
            let name = unit_name(descriptor.directory());
            BuildUnit {
                id,
                name,
                build_system: descriptor.build_system,
                source_folders: descriptor
                    .source_folders
                    .into_iter()
                    .map(|(path, code_type)| SourceFolder {
                        path,
                        code_type,
                        unit: id,
                    })
                    .collect(),
                descriptor_path: descriptor.descriptor_path,
                children,
                parent: parent.map(BuildUnitId::from_index),
            }
        })
        .collect();

    let tree = BuildUnitTree::from_units(units);
    tracing::debug!(
        target: "pitkit.project",
        units = tree.len(),
        roots = tree.roots().count(),
        "rebuilt build unit hierarchy"
    );
    tree
}

/// Closest strict ancestor directory; the first in sort order wins a tie.
fn immediate_parent(sorted: &[BuildDescriptor], idx: usize) -> Option<usize> {
    let dir = sorted[idx].directory();
    let mut best: Option<usize> = None;
    for (candidate_idx, candidate) in sorted.iter().enumerate() {
        let candidate_dir = candidate.directory();
        if candidate_idx == idx || candidate_dir == dir || !dir.starts_with(candidate_dir) {
            continue;
        }
        if best.map_or(true, |best| sorted[best].depth() < candidate.depth()) {
            best = Some(candidate_idx);
        }
    }
    best
}

fn unit_name(dir: &Path) -> String {
    dir.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("root")
        .to_string()
}
