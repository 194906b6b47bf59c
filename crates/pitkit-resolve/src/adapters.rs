use pitkit_model::{CodeClass, CodeElement, CodePackage, SourceFolder};

use crate::syntax::{DeclaredType, SyntaxIndex, SyntaxNode, SyntaxNodeKind};

/// Turns a syntax node into a code element for one source language.
pub trait LanguageAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_resolve(
        &self,
        index: &dyn SyntaxIndex,
        node: &SyntaxNode,
        folder: &SourceFolder,
    ) -> Option<CodeElement>;
}

/// `.java` files and package directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaAdapter;

impl LanguageAdapter for JavaAdapter {
    fn name(&self) -> &'static str {
        "java"
    }

    fn try_resolve(
        &self,
        index: &dyn SyntaxIndex,
        node: &SyntaxNode,
        folder: &SourceFolder,
    ) -> Option<CodeElement> {
        match node.kind {
            SyntaxNodeKind::File if node.extension() == Some("java") => {
                class_element(index, node, folder)
            }
            SyntaxNodeKind::Directory => {
                let qualified_name = index.package_of(node).filter(|name| !name.trim().is_empty())?;
                Some(CodeElement::Package(CodePackage {
                    path: node.path.clone(),
                    qualified_name,
                    source_folder: folder.clone(),
                }))
            }
            SyntaxNodeKind::File => None,
        }
    }
}

/// `.kt` files. Package directories are handled by [`JavaAdapter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinAdapter;

impl LanguageAdapter for KotlinAdapter {
    fn name(&self) -> &'static str {
        "kotlin"
    }

    fn try_resolve(
        &self,
        index: &dyn SyntaxIndex,
        node: &SyntaxNode,
        folder: &SourceFolder,
    ) -> Option<CodeElement> {
        if node.kind == SyntaxNodeKind::File && node.extension() == Some("kt") {
            class_element(index, node, folder)
        } else {
            None
        }
    }
}

fn class_element(
    index: &dyn SyntaxIndex,
    node: &SyntaxNode,
    folder: &SourceFolder,
) -> Option<CodeElement> {
    let types = index.top_level_types(node);
    let primary = primary_type(&types)?;
    Some(CodeElement::Class(CodeClass {
        path: node.path.clone(),
        qualified_name: primary.qualified_name.clone(),
        simple_name: primary.simple_name.clone(),
        source_folder: folder.clone(),
    }))
}

/// First public type, falling back to the first declared one.
pub fn primary_type(types: &[DeclaredType]) -> Option<&DeclaredType> {
    types
        .iter()
        .find(|ty| ty.is_public)
        .or_else(|| types.first())
}

/// Adapters tried in a fixed order; the first match wins.
pub struct LanguageAdapters {
    adapters: Vec<Box<dyn LanguageAdapter>>,
}

impl LanguageAdapters {
    pub fn new(adapters: Vec<Box<dyn LanguageAdapter>>) -> Self {
        Self { adapters }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.adapters.iter().map(|adapter| adapter.name())
    }

    pub fn try_resolve(
        &self,
        index: &dyn SyntaxIndex,
        node: &SyntaxNode,
        folder: &SourceFolder,
    ) -> Option<CodeElement> {
        self.adapters
            .iter()
            .find_map(|adapter| adapter.try_resolve(index, node, folder))
    }
}

impl Default for LanguageAdapters {
    fn default() -> Self {
        Self::new(vec![Box::new(JavaAdapter), Box::new(KotlinAdapter)])
    }
}

impl std::fmt::Debug for LanguageAdapters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
