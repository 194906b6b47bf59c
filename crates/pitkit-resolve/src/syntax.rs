use std::path::{Path, PathBuf};

use pitkit_model::ReadGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxNodeKind {
    Directory,
    File,
}

/// A file or directory known to the syntax index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxNode {
    pub path: PathBuf,
    pub kind: SyntaxNodeKind,
}

impl SyntaxNode {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: SyntaxNodeKind::Directory,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: SyntaxNodeKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == SyntaxNodeKind::Directory
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|ext| ext.to_str())
    }
}

/// A top-level type declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    pub qualified_name: String,
    pub simple_name: String,
    pub is_public: bool,
    /// File declaring the type.
    pub path: PathBuf,
}

/// Set of source roots a class search is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchScope {
    roots: Vec<PathBuf>,
}

impl SearchScope {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }
}

/// Read-only view of parsed sources.
///
/// All lookups made while a [`SyntaxIndex::read_guard`] is held must observe
/// the same snapshot.
pub trait SyntaxIndex {
    fn node_at(&self, path: &Path) -> Option<SyntaxNode>;

    /// Direct children of a directory node, sorted by path.
    fn children(&self, dir: &SyntaxNode) -> Vec<SyntaxNode>;

    /// Top-level types of a source file, in declaration order.
    fn top_level_types(&self, file: &SyntaxNode) -> Vec<DeclaredType>;

    /// Qualified package name of a directory under a source root.
    fn package_of(&self, dir: &SyntaxNode) -> Option<String>;

    fn find_classes_by_name(&self, simple_name: &str, scope: &SearchScope) -> Vec<DeclaredType>;

    fn read_guard(&self) -> ReadGuard<'_> {
        ReadGuard::noop()
    }
}
