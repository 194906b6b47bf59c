use pitkit_model::{
    names, BuildUnitTree, CodeClass, CodeElement, CodePackage, CodeType, SourceFolder,
};

use crate::syntax::{DeclaredType, SearchScope, SyntaxIndex};

/// Counterparts found on the opposite side plus correspondence warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub elements: Vec<CodeElement>,
    pub errors: Vec<String>,
}

/// Finds the production/test counterpart of each selected element.
pub struct CorrespondenceResolver<'a> {
    tree: &'a BuildUnitTree,
    index: &'a dyn SyntaxIndex,
}

impl<'a> CorrespondenceResolver<'a> {
    pub fn new(tree: &'a BuildUnitTree, index: &'a dyn SyntaxIndex) -> Self {
        Self { tree, index }
    }

    /// Looks up each element's counterpart of `target` code type.
    ///
    /// Elements already of the target type, and elements whose build unit has
    /// no source folder of that type, are skipped without error.
    pub fn discover(&self, elements: &[CodeElement], target: CodeType) -> Discovery {
        let mut discovery = Discovery::default();

        for element in elements {
            if element.code_type() == target {
                continue;
            }
            let targets = self.target_folders(element.source_folder(), target);
            let Some(primary) = targets.first() else {
                tracing::debug!(
                    target: "pitkit.resolve",
                    element = element.qualified_name(),
                    side = target.label(),
                    "build unit has no opposite source folder"
                );
                continue;
            };

            let found = match element {
                CodeElement::Package(pkg) => self.find_package(pkg, &targets, primary),
                CodeElement::Class(class) => match self.find_class(class, &targets, primary) {
                    Some(found) => found,
                    None => continue,
                },
            };

            match found {
                Ok(counterpart) => discovery.elements.push(counterpart),
                Err(message) => discovery.errors.push(message),
            }
        }

        discovery
    }

    /// Source folders of `code_type` in the unit owning `folder`, first one first.
    fn target_folders(&self, folder: &SourceFolder, code_type: CodeType) -> Vec<&'a SourceFolder> {
        let tree: &'a BuildUnitTree = self.tree;
        tree.unit_of(folder)
            .map(|unit| {
                unit.source_folders
                    .iter()
                    .filter(|candidate| candidate.code_type == code_type)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_package(
        &self,
        pkg: &CodePackage,
        targets: &[&SourceFolder],
        primary: &SourceFolder,
    ) -> Result<CodeElement, String> {
        let relative = pkg.qualified_name.replace('.', "/");
        for folder in targets {
            let dir = folder.path.join(&relative);
            let declared = self
                .index
                .node_at(&dir)
                .filter(|node| node.is_dir())
                .and_then(|node| self.index.package_of(&node));
            if declared.as_deref() == Some(pkg.qualified_name.as_str()) {
                return Ok(CodeElement::Package(CodePackage {
                    path: dir,
                    qualified_name: pkg.qualified_name.clone(),
                    source_folder: (*folder).clone(),
                }));
            }
        }

        Err(format!(
            "Package {} not found in {} source folder",
            pkg.qualified_name,
            primary.code_type.label()
        ))
    }

    /// `None` when the class has no counterpart to look for.
    fn find_class(
        &self,
        class: &CodeClass,
        targets: &[&SourceFolder],
        primary: &SourceFolder,
    ) -> Option<Result<CodeElement, String>> {
        let (simple_name, qualified_name) = counterpart_names(class, primary.code_type)?;

        let scope = SearchScope::new(targets.iter().map(|folder| folder.path.clone()));
        let candidates = self.index.find_classes_by_name(&simple_name, &scope);
        let source_package = names::parent_package(&class.qualified_name);

        let Some(chosen) = select_candidate(&candidates, source_package) else {
            let mut message = format!(
                "Class {qualified_name} not found in {} source folder",
                primary.code_type.label()
            );
            if candidates.len() > 1 {
                let listed: Vec<&str> = candidates
                    .iter()
                    .map(|candidate| candidate.qualified_name.as_str())
                    .collect();
                message.push_str(&format!(" (ambiguous candidates: {})", listed.join(", ")));
            }
            return Some(Err(message));
        };

        let source_folder = self
            .tree
            .source_folder_containing(&chosen.path)
            .filter(|folder| folder.code_type == primary.code_type)
            .unwrap_or(primary)
            .clone();

        Some(Ok(CodeElement::Class(CodeClass {
            path: chosen.path.clone(),
            qualified_name: chosen.qualified_name.clone(),
            simple_name: chosen.simple_name.clone(),
            source_folder,
        })))
    }
}

/// Expected `(simple, qualified)` name of a class's counterpart.
///
/// Production classes map to `<Name>Test`; test classes map back only when
/// they carry the `Test` suffix.
pub fn counterpart_names(class: &CodeClass, target: CodeType) -> Option<(String, String)> {
    match target {
        CodeType::Test => Some((
            format!("{}Test", class.simple_name),
            format!("{}Test", class.qualified_name),
        )),
        CodeType::Production => {
            let simple = class.simple_name.strip_suffix("Test")?;
            let qualified = class.qualified_name.strip_suffix("Test")?;
            Some((simple.to_string(), qualified.to_string()))
        }
    }
}

/// Picks the counterpart among same-named classes.
///
/// A single candidate always wins. Otherwise an exact package match wins,
/// then the only candidate in a parent or child package. Anything else is
/// treated as not found.
pub fn select_candidate<'c>(
    candidates: &'c [DeclaredType],
    source_package: &str,
) -> Option<&'c DeclaredType> {
    if let [only] = candidates {
        return Some(only);
    }

    if let Some(exact) = candidates
        .iter()
        .find(|candidate| package_of(candidate) == source_package)
    {
        return Some(exact);
    }

    let mut related = candidates.iter().filter(|candidate| {
        let package = package_of(candidate);
        names::is_subpackage_or_same(package, source_package)
            || names::is_subpackage_or_same(source_package, package)
    });
    match (related.next(), related.next()) {
        (Some(unique), None) => Some(unique),
        _ => None,
    }
}

fn package_of(candidate: &DeclaredType) -> &str {
    names::parent_package(&candidate.qualified_name)
}
