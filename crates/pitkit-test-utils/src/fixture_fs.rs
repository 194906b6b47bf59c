use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A project tree in a temporary directory, removed on drop.
pub struct TempProject {
    _dir: TempDir,
    root: PathBuf,
}

impl TempProject {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp project dir");
        // Canonical so paths compare equal to what the filesystem workspace reports.
        let root = fs::canonicalize(dir.path()).expect("canonicalize temp project dir");
        Self { _dir: dir, root }
    }

    /// Builds a project from a multi-file fixture.
    ///
    /// Each file starts with a `//- /relative/path` header line; everything up
    /// to the next header is the file content. A header ending in `/` creates
    /// an empty directory.
    pub fn from_fixture(fixture: &str) -> Self {
        let project = Self::new();
        let mut current: Option<(String, String)> = None;

        for line in fixture.lines() {
            if let Some(header) = line.trim_start().strip_prefix("//- ") {
                if let Some((path, text)) = current.take() {
                    project.write(&path, &text);
                }
                let path = header.trim().trim_start_matches('/').to_string();
                if path.ends_with('/') {
                    project.mkdir(&path);
                } else {
                    current = Some((path, String::new()));
                }
                continue;
            }
            if let Some((_, text)) = current.as_mut() {
                text.push_str(line);
                text.push('\n');
            }
        }
        if let Some((path, text)) = current {
            project.write(&path, &text);
        }

        tracing::debug!(root = %project.root.display(), "materialized fixture project");
        project
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parent dir");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("create fixture dir");
        path
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}

/// A Java source file declaring one public class.
pub fn java_class(qualified_name: &str) -> String {
    let (package, simple) = match qualified_name.rfind('.') {
        Some(idx) => (&qualified_name[..idx], &qualified_name[idx + 1..]),
        None => ("", qualified_name),
    };
    if package.is_empty() {
        format!("public class {simple} {{\n}}\n")
    } else {
        format!("package {package};\n\npublic class {simple} {{\n}}\n")
    }
}

/// A Kotlin source file declaring one class.
pub fn kotlin_class(qualified_name: &str) -> String {
    let (package, simple) = match qualified_name.rfind('.') {
        Some(idx) => (&qualified_name[..idx], &qualified_name[idx + 1..]),
        None => ("", qualified_name),
    };
    if package.is_empty() {
        format!("class {simple} {{\n}}\n")
    } else {
        format!("package {package}\n\nclass {simple} {{\n}}\n")
    }
}
