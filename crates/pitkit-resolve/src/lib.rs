//! Selection resolution for pitkit.
//!
//! Given a [`BuildUnitTree`](pitkit_model::BuildUnitTree) and a
//! [`SyntaxIndex`], this crate maps selected paths to packages and classes,
//! drops redundant selections, finds production/test counterparts and picks
//! the build unit to run against. [`MutationCoverageResolver`] wires those
//! steps into one request.

mod adapters;
mod correspondence;
mod elements;
mod fs_index;
mod pipeline;
mod reduce;
mod syntax;
mod working_unit;

pub use adapters::{primary_type, JavaAdapter, KotlinAdapter, LanguageAdapter, LanguageAdapters};
pub use correspondence::{counterpart_names, select_candidate, CorrespondenceResolver, Discovery};
pub use elements::{CodeElementResolver, Resolution};
pub use fs_index::FsSyntaxIndex;
pub use pipeline::MutationCoverageResolver;
pub use reduce::reduce;
pub use syntax::{DeclaredType, SearchScope, SyntaxIndex, SyntaxNode, SyntaxNodeKind};
pub use working_unit::select_working_unit;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no build system detected: no pom.xml, build.gradle or build.gradle.kts found")]
    NoBuildSystem,

    #[error("nothing selected{}", describe_errors(.errors))]
    NothingSelected { errors: Vec<String> },
}

impl ResolveError {
    /// Per-path messages that explain why nothing could be selected.
    pub fn errors(&self) -> &[String] {
        match self {
            ResolveError::NoBuildSystem => &[],
            ResolveError::NothingSelected { errors } => errors,
        }
    }
}

fn describe_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(": {}", errors.join("; "))
    }
}
