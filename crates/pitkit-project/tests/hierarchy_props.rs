use std::collections::BTreeSet;
use std::path::PathBuf;

use pitkit_model::BuildSystem;
use pitkit_project::{build_hierarchy, BuildDescriptor};
use proptest::prelude::*;

fn descriptor_dirs() -> impl Strategy<Value = BTreeSet<Vec<u8>>> {
    // Directories are paths over a tiny alphabet so nesting is common.
    prop::collection::btree_set(prop::collection::vec(0u8..3, 0..5), 1..12)
}

fn to_descriptors(dirs: &BTreeSet<Vec<u8>>) -> Vec<BuildDescriptor> {
    dirs.iter()
        .map(|segments| {
            let mut path = PathBuf::from("/w");
            for segment in segments {
                path.push(format!("m{segment}"));
            }
            BuildDescriptor {
                build_system: BuildSystem::Maven,
                descriptor_path: path.join("pom.xml"),
                source_folders: Vec::new(),
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn parents_strictly_contain_children_and_are_closest(dirs in descriptor_dirs()) {
        let descriptors = to_descriptors(&dirs);
        let tree = build_hierarchy(descriptors);
        prop_assert_eq!(tree.len(), dirs.len());

        for unit in tree.iter() {
            if let Some(parent) = tree.parent(unit.id) {
                prop_assert!(unit.directory().starts_with(parent.directory()));
                prop_assert_ne!(unit.directory(), parent.directory());
                prop_assert!(parent.children.contains(&unit.id));

                // No other unit sits strictly between parent and child.
                for other in tree.iter() {
                    let between = other.directory() != parent.directory()
                        && other.directory() != unit.directory()
                        && other.directory().starts_with(parent.directory())
                        && unit.directory().starts_with(other.directory());
                    prop_assert!(!between);
                }
            } else {
                for other in tree.iter() {
                    prop_assert!(
                        other.id == unit.id || !unit.directory().starts_with(other.directory())
                    );
                }
            }
        }
    }

    #[test]
    fn hierarchy_is_acyclic(dirs in descriptor_dirs()) {
        let tree = build_hierarchy(to_descriptors(&dirs));
        for unit in tree.iter() {
            // Ancestor chains are bounded by the number of units.
            prop_assert!(tree.ancestors(unit.id).count() < tree.len());
            prop_assert!(tree.root_of(unit.id).unwrap().is_root());
        }
    }
}
