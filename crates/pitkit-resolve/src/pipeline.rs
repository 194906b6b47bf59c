use std::collections::HashSet;
use std::path::PathBuf;

use pitkit_config::ActionSettings;
use pitkit_model::{format_targets, BuildUnitTree, CodeElement, CodeType, MutationCoverageOptions};

use crate::adapters::LanguageAdapters;
use crate::correspondence::CorrespondenceResolver;
use crate::elements::{CodeElementResolver, Resolution};
use crate::reduce::reduce;
use crate::syntax::SyntaxIndex;
use crate::working_unit::select_working_unit;
use crate::ResolveError;

/// Turns a selection of paths into mutation-coverage options.
pub struct MutationCoverageResolver<'a> {
    tree: &'a BuildUnitTree,
    index: &'a dyn SyntaxIndex,
    adapters: &'a LanguageAdapters,
}

impl<'a> MutationCoverageResolver<'a> {
    pub fn new(
        tree: &'a BuildUnitTree,
        index: &'a dyn SyntaxIndex,
        adapters: &'a LanguageAdapters,
    ) -> Self {
        Self {
            tree,
            index,
            adapters,
        }
    }

    /// Resolves a project-view selection.
    ///
    /// Per-element problems end up in [`MutationCoverageOptions::errors`];
    /// only a missing build system or an empty selection is an `Err`.
    pub fn resolve(
        &self,
        paths: &[PathBuf],
        saved: &ActionSettings,
    ) -> Result<MutationCoverageOptions, ResolveError> {
        let _read = self.index.read_guard();

        if self.tree.is_empty() {
            return Err(ResolveError::NoBuildSystem);
        }

        let Resolution {
            elements,
            mut errors,
        } = CodeElementResolver::new(self.tree, self.index, self.adapters).resolve(paths);

        let (tests, production): (Vec<CodeElement>, Vec<CodeElement>) = elements
            .iter()
            .cloned()
            .partition(|element| element.code_type() == CodeType::Test);
        let production = reduce(&production);
        let tests = reduce(&tests);

        let correspondence = CorrespondenceResolver::new(self.tree, self.index);
        let found_tests = correspondence.discover(&production, CodeType::Test);
        let found_production = correspondence.discover(&tests, CodeType::Production);
        errors.extend(found_tests.errors);
        errors.extend(found_production.errors);

        let production = reduce(&distinct_by_name(
            production.into_iter().chain(found_production.elements),
        ));
        let tests = reduce(&distinct_by_name(tests.into_iter().chain(found_tests.elements)));

        let Some(unit) = select_working_unit(self.tree, &elements) else {
            return Err(ResolveError::NothingSelected { errors });
        };

        tracing::info!(
            target: "pitkit.resolve",
            selected = paths.len(),
            production = production.len(),
            tests = tests.len(),
            errors = errors.len(),
            working_unit = %unit.name,
            "resolved mutation coverage selection"
        );

        let mut options = MutationCoverageOptions::new(unit.build_system, unit.id)
            .with_targets(format_targets(&production), format_targets(&tests))
            .with_actions(saved.pre_actions.clone(), saved.post_actions.clone());
        options.errors = errors;
        Ok(options)
    }

    /// Resolves the file open in an editor.
    pub fn resolve_file(
        &self,
        path: PathBuf,
        saved: &ActionSettings,
    ) -> Result<MutationCoverageOptions, ResolveError> {
        self.resolve(&[path], saved)
    }
}

fn distinct_by_name(elements: impl Iterator<Item = CodeElement>) -> Vec<CodeElement> {
    let mut seen = HashSet::new();
    elements
        .filter(|element| seen.insert(element.qualified_name().to_string()))
        .collect()
}
