use std::collections::HashSet;

use pitkit_model::{names, CodeElement};

/// Drops selections made redundant by a selected ancestor package.
///
/// Packages are reduced among themselves first; classes are then filtered
/// against the surviving packages. Duplicate qualified names collapse to the
/// first occurrence. Input order is otherwise preserved.
pub fn reduce(elements: &[CodeElement]) -> Vec<CodeElement> {
    let mut seen_packages = HashSet::new();
    let packages: Vec<&CodeElement> = elements
        .iter()
        .filter(|element| element.is_package())
        .filter(|element| seen_packages.insert(element.qualified_name()))
        .collect();

    let surviving: Vec<&str> = packages
        .iter()
        .map(|pkg| pkg.qualified_name())
        .filter(|name| {
            !packages
                .iter()
                .any(|other| names::is_strict_subpackage(name, other.qualified_name()))
        })
        .collect();

    let mut seen_classes = HashSet::new();
    let mut emitted_packages = HashSet::new();
    elements
        .iter()
        .filter(|element| {
            let name = element.qualified_name();
            if element.is_package() {
                surviving.contains(&name) && emitted_packages.insert(name)
            } else {
                !surviving
                    .iter()
                    .any(|pkg| names::is_strict_subpackage(name, pkg))
                    && seen_classes.insert(name)
            }
        })
        .cloned()
        .collect()
}
