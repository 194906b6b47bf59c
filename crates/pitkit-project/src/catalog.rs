use std::path::{Component, Path};

use pitkit_model::CodeType;

use crate::{SourceRootEntry, SourceRootKind};

/// Classification of a registered source root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderClass {
    pub code_type: CodeType,
    pub is_autogenerated: bool,
}

/// Decides which workspace source roots count as pitkit source folders.
#[derive(Debug, Clone, Default)]
pub struct SourceFolderCatalog {
    extra_markers: Vec<String>,
}

impl SourceFolderCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds path segments that mark a folder as generated, on top of the
    /// built-in `generated*`, `.gradle` and `manifests` markers.
    pub fn with_generated_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra_markers: markers
                .into_iter()
                .map(|marker| -> String { marker.into() })
                .filter(|marker| !marker.trim().is_empty())
                .collect(),
        }
    }

    /// `None` means "not a source folder" (resource roots, empty paths).
    pub fn classify(&self, entry: &SourceRootEntry) -> Option<FolderClass> {
        if entry.kind != SourceRootKind::Source || entry.path.as_os_str().is_empty() {
            return None;
        }

        let code_type = if entry.is_test {
            CodeType::Test
        } else {
            CodeType::Production
        };
        Some(FolderClass {
            code_type,
            is_autogenerated: entry.is_generated || self.has_generated_marker(&entry.path),
        })
    }

    /// Code type of a hand-written source folder; generated folders are rejected.
    pub fn accepts(&self, entry: &SourceRootEntry) -> Option<CodeType> {
        self.classify(entry)
            .filter(|class| !class.is_autogenerated)
            .map(|class| class.code_type)
    }

    fn has_generated_marker(&self, path: &Path) -> bool {
        let segments = path.components().filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        });

        for segment in segments {
            if segment.starts_with("generated") || segment == ".gradle" {
                return true;
            }
            if self.extra_markers.iter().any(|marker| marker == segment) {
                return true;
            }
        }

        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.eq_ignore_ascii_case("manifests"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(path: &str, is_test: bool) -> SourceRootEntry {
        SourceRootEntry::source(path, is_test)
    }

    #[test]
    fn test_flag_decides_code_type() {
        let catalog = SourceFolderCatalog::new();
        assert_eq!(
            catalog.accepts(&entry("/p/src/main/java", false)),
            Some(CodeType::Production)
        );
        assert_eq!(
            catalog.accepts(&entry("/p/src/test/java", true)),
            Some(CodeType::Test)
        );
    }

    #[test]
    fn generated_segments_are_autogenerated() {
        let catalog = SourceFolderCatalog::new();
        for path in [
            "/p/target/generated-sources/annotations",
            "/p/build/generated/source/kapt/main",
            "/p/.gradle/kotlin",
            "/p/app/src/main/manifests",
        ] {
            let class = catalog.classify(&entry(path, false)).unwrap();
            assert!(class.is_autogenerated, "{path}");
            assert_eq!(catalog.accepts(&entry(path, false)), None);
        }
    }

    #[test]
    fn workspace_generated_flag_is_honoured() {
        let catalog = SourceFolderCatalog::new();
        let mut root = entry("/p/src/gen/java", false);
        root.is_generated = true;
        assert!(catalog.classify(&root).unwrap().is_autogenerated);
    }

    #[test]
    fn configured_markers_extend_builtins() {
        let catalog = SourceFolderCatalog::with_generated_markers(["apt-out", " "]);
        assert!(catalog
            .classify(&entry("/p/apt-out/java", false))
            .unwrap()
            .is_autogenerated);
        assert!(!catalog
            .classify(&entry("/p/src/main/java", false))
            .unwrap()
            .is_autogenerated);
    }

    #[test]
    fn resources_and_empty_paths_are_not_source_folders() {
        let catalog = SourceFolderCatalog::new();
        let resources = SourceRootEntry {
            path: PathBuf::from("/p/src/main/resources"),
            kind: SourceRootKind::Resources,
            is_test: false,
            is_generated: false,
        };
        assert_eq!(catalog.classify(&resources), None);
        assert_eq!(catalog.classify(&entry("", false)), None);
    }
}
