use std::collections::BTreeSet;

use pitkit_model::{BuildUnit, BuildUnitId, BuildUnitTree, CodeElement};

/// Chooses the build unit a selection should run against.
///
/// With several units involved, a unit nested under another involved unit
/// outranks one that is not, then deeper directories win, then the smaller
/// descriptor path.
pub fn select_working_unit<'t>(
    tree: &'t BuildUnitTree,
    elements: &[CodeElement],
) -> Option<&'t BuildUnit> {
    let involved: BTreeSet<BuildUnitId> = elements
        .iter()
        .map(|element| element.source_folder().unit)
        .collect();

    let mut units = involved.iter().filter_map(|id| tree.get(*id));
    let first = units.next()?;

    let is_nested = |unit: &BuildUnit| {
        tree.ancestors(unit.id)
            .any(|ancestor| involved.contains(&ancestor.id))
    };

    let chosen = units.fold(first, |best, unit| {
        let best_rank = (is_nested(best), best.depth());
        let rank = (is_nested(unit), unit.depth());
        if rank > best_rank || (rank == best_rank && unit.descriptor_path < best.descriptor_path) {
            unit
        } else {
            best
        }
    });
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitkit_model::{BuildSystem, CodePackage, CodeType, SourceFolder};
    use std::path::PathBuf;

    fn unit(idx: usize, dir: &str, parent: Option<usize>, children: &[usize]) -> BuildUnit {
        let id = BuildUnitId::from_index(idx);
        BuildUnit {
            id,
            name: dir.rsplit('/').next().unwrap().to_string(),
            build_system: BuildSystem::Gradle,
            descriptor_path: PathBuf::from(dir).join("build.gradle.kts"),
            source_folders: vec![SourceFolder {
                path: PathBuf::from(dir).join("src/main/java"),
                code_type: CodeType::Production,
                unit: id,
            }],
            children: children.iter().map(|c| BuildUnitId::from_index(*c)).collect(),
            parent: parent.map(BuildUnitId::from_index),
        }
    }

    fn tree() -> BuildUnitTree {
        BuildUnitTree::from_units(vec![
            unit(0, "/w/libs/core", Some(3), &[]),
            unit(1, "/w/app", Some(3), &[]),
            unit(2, "/w/api", Some(3), &[]),
            unit(3, "/w", None, &[0, 1, 2]),
        ])
    }

    fn element_in(tree: &BuildUnitTree, idx: usize) -> CodeElement {
        let folder = tree[BuildUnitId::from_index(idx)].source_folders[0].clone();
        CodeElement::Package(CodePackage {
            path: folder.path.join("com"),
            qualified_name: "com".into(),
            source_folder: folder,
        })
    }

    #[test]
    fn nothing_selected_yields_none() {
        assert!(select_working_unit(&tree(), &[]).is_none());
    }

    #[test]
    fn single_unit_is_returned() {
        let tree = tree();
        let unit = select_working_unit(&tree, &[element_in(&tree, 3)]).unwrap();
        assert_eq!(unit.name, "w");
    }

    #[test]
    fn nested_unit_outranks_its_parent() {
        let tree = tree();
        let unit =
            select_working_unit(&tree, &[element_in(&tree, 3), element_in(&tree, 1)]).unwrap();
        assert_eq!(unit.name, "app");
    }

    #[test]
    fn deeper_unit_wins_then_path_breaks_ties() {
        let tree = tree();
        let deeper =
            select_working_unit(&tree, &[element_in(&tree, 1), element_in(&tree, 0)]).unwrap();
        assert_eq!(deeper.name, "core");

        let tie =
            select_working_unit(&tree, &[element_in(&tree, 1), element_in(&tree, 2)]).unwrap();
        assert_eq!(tie.name, "api");
    }
}
