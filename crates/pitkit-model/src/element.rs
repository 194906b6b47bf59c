use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::names;
use crate::{CodeType, SourceFolder};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CodePackage {
    pub path: PathBuf,
    pub qualified_name: String,
    pub source_folder: SourceFolder,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CodeClass {
    pub path: PathBuf,
    pub qualified_name: String,
    pub simple_name: String,
    pub source_folder: SourceFolder,
}

/// A resolved selection target: a package directory or a single-type source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CodeElement {
    Package(CodePackage),
    Class(CodeClass),
}

impl CodeElement {
    pub fn path(&self) -> &Path {
        match self {
            CodeElement::Package(pkg) => &pkg.path,
            CodeElement::Class(class) => &class.path,
        }
    }

    pub fn qualified_name(&self) -> &str {
        match self {
            CodeElement::Package(pkg) => &pkg.qualified_name,
            CodeElement::Class(class) => &class.qualified_name,
        }
    }

    pub fn source_folder(&self) -> &SourceFolder {
        match self {
            CodeElement::Package(pkg) => &pkg.source_folder,
            CodeElement::Class(class) => &class.source_folder,
        }
    }

    pub fn code_type(&self) -> CodeType {
        self.source_folder().code_type
    }

    pub fn is_package(&self) -> bool {
        matches!(self, CodeElement::Package(_))
    }

    /// The package this element lives in (a package is its own package).
    pub fn package_name(&self) -> &str {
        match self {
            CodeElement::Package(pkg) => &pkg.qualified_name,
            CodeElement::Class(class) => names::parent_package(&class.qualified_name),
        }
    }

    /// PIT target specifier: `a.b.*` for packages, `a.b.C` for classes.
    pub fn target_string(&self) -> String {
        match self {
            CodeElement::Package(pkg) => format!("{}.*", pkg.qualified_name),
            CodeElement::Class(class) => class.qualified_name.clone(),
        }
    }
}

impl From<CodePackage> for CodeElement {
    fn from(pkg: CodePackage) -> Self {
        CodeElement::Package(pkg)
    }
}

impl From<CodeClass> for CodeElement {
    fn from(class: CodeClass) -> Self {
        CodeElement::Class(class)
    }
}

/// Renders elements as a sorted, de-duplicated, comma-joined target list.
pub fn format_targets<'a>(elements: impl IntoIterator<Item = &'a CodeElement>) -> String {
    let targets: BTreeSet<String> = elements
        .into_iter()
        .map(CodeElement::target_string)
        .collect();
    targets.into_iter().collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuildUnitId;

    fn folder() -> SourceFolder {
        SourceFolder {
            path: PathBuf::from("/p/src/main/java"),
            code_type: CodeType::Production,
            unit: BuildUnitId::from_index(0),
        }
    }

    fn class(qualified: &str) -> CodeElement {
        CodeElement::Class(CodeClass {
            path: PathBuf::from(format!(
                "/p/src/main/java/{}.java",
                qualified.replace('.', "/")
            )),
            qualified_name: qualified.into(),
            simple_name: names::simple_name(qualified).into(),
            source_folder: folder(),
        })
    }

    fn package(qualified: &str) -> CodeElement {
        CodeElement::Package(CodePackage {
            path: PathBuf::from(format!("/p/src/main/java/{}", qualified.replace('.', "/"))),
            qualified_name: qualified.into(),
            source_folder: folder(),
        })
    }

    #[test]
    fn targets_are_sorted_and_deduplicated() {
        let elements = vec![
            class("com.myproject.package2.ClassB"),
            package("com.myproject.package1"),
            class("com.myproject.package2.ClassB"),
        ];
        assert_eq!(
            format_targets(&elements),
            "com.myproject.package1.*,com.myproject.package2.ClassB"
        );
    }

    #[test]
    fn empty_selection_formats_to_empty_string() {
        assert_eq!(format_targets(std::iter::empty()), "");
    }

    #[test]
    fn class_package_name_strips_simple_name() {
        assert_eq!(
            class("com.myproject.package1.ClassA").package_name(),
            "com.myproject.package1"
        );
        assert_eq!(
            package("com.myproject.package1").package_name(),
            "com.myproject.package1"
        );
    }

    #[test]
    fn elements_serialize_with_kind_tag() {
        let json = serde_json::to_value(package("com.acme")).unwrap();
        assert_eq!(json["kind"], "package");
        assert_eq!(json["qualified_name"], "com.acme");
    }
}
