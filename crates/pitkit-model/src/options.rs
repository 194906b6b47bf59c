use serde::Serialize;

use crate::{BuildSystem, BuildUnitId};

/// The resolved mutation-coverage intent for one request.
///
/// The presentation layer may edit the free-text fields until the user
/// confirms; afterwards the value is only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationCoverageOptions {
    /// Comma-joined, sorted production targets (`a.b.*`, `a.b.C`).
    pub target_classes: String,
    /// Comma-joined, sorted test targets.
    pub target_tests: String,
    pub pre_actions: String,
    pub post_actions: String,
    /// Correspondence and per-path resolution problems.
    pub errors: Vec<String>,
    pub working_unit: BuildUnitId,
    pub build_system: BuildSystem,
}

impl MutationCoverageOptions {
    pub fn new(build_system: BuildSystem, working_unit: BuildUnitId) -> Self {
        Self {
            target_classes: String::new(),
            target_tests: String::new(),
            pre_actions: String::new(),
            post_actions: String::new(),
            errors: Vec::new(),
            working_unit,
            build_system,
        }
    }

    pub fn with_targets(
        mut self,
        target_classes: impl Into<String>,
        target_tests: impl Into<String>,
    ) -> Self {
        self.target_classes = target_classes.into();
        self.target_tests = target_tests.into();
        self
    }

    pub fn with_actions(
        mut self,
        pre_actions: impl Into<String>,
        post_actions: impl Into<String>,
    ) -> Self {
        self.pre_actions = pre_actions.into();
        self.post_actions = post_actions.into();
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
