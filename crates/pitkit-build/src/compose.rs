use std::fmt;

use pitkit_model::{BuildSystem, BuildUnitTree, MutationCoverageOptions};
use serde::Serialize;

pub const MAVEN_PITEST_GOAL: &str = "pitest:mutationCoverage";
pub const MAVEN_TEST_COMPILE_GOAL: &str = "test-compile";
pub const GRADLE_PITEST_TASK: &str = "pitest";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeSettings {
    /// Maven only: run `test-compile` ahead of the mutation goal.
    pub compile_tests_first: bool,
}

/// Goals/tasks and `-D`/`-P` properties for one mutation-coverage run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildCommand {
    pub build_system: BuildSystem,
    pub goals: Vec<String>,
    /// `(name, value)` pairs; empty values are never stored.
    pub properties: Vec<(String, String)>,
}

impl BuildCommand {
    /// Goals followed by the property flags, as passed to the build tool.
    pub fn arguments(&self) -> Vec<String> {
        render_arguments(self.build_system, &self.goals, &self.properties)
    }

    pub fn command_line(&self) -> String {
        let mut out = self.build_system.executable().to_string();
        for arg in self.arguments() {
            out.push(' ');
            out.push_str(&arg);
        }
        out
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

pub(crate) fn render_arguments(
    build_system: BuildSystem,
    goals: &[String],
    properties: &[(String, String)],
) -> Vec<String> {
    let flag = match build_system {
        BuildSystem::Maven => "-D",
        BuildSystem::Gradle => "-P",
    };
    goals
        .iter()
        .cloned()
        .chain(
            properties
                .iter()
                .map(|(name, value)| format!("{flag}{name}={value}")),
        )
        .collect()
}

/// Renders [`MutationCoverageOptions`] as a build-tool command.
#[derive(Debug, Clone, Copy)]
pub struct CommandComposer<'a> {
    tree: &'a BuildUnitTree,
    settings: ComposeSettings,
}

impl<'a> CommandComposer<'a> {
    pub fn new(tree: &'a BuildUnitTree, settings: ComposeSettings) -> Self {
        Self { tree, settings }
    }

    /// The command line shown to the user before confirming a run.
    pub fn compose(&self, options: &MutationCoverageOptions, build_system: BuildSystem) -> String {
        self.command(options, build_system).command_line()
    }

    pub fn command(
        &self,
        options: &MutationCoverageOptions,
        build_system: BuildSystem,
    ) -> BuildCommand {
        let prefix = self.module_prefix(options);
        let prefix = prefix.as_deref();

        let mut goals = action_tokens(&options.pre_actions, prefix);
        match build_system {
            BuildSystem::Maven => {
                if self.settings.compile_tests_first {
                    goals.push(MAVEN_TEST_COMPILE_GOAL.to_string());
                }
                goals.push(MAVEN_PITEST_GOAL.to_string());
            }
            BuildSystem::Gradle => goals.push(qualify(GRADLE_PITEST_TASK, prefix)),
        }
        goals.extend(action_tokens(&options.post_actions, prefix));

        let (classes_key, tests_key) = match build_system {
            BuildSystem::Maven => ("targetClasses", "targetTests"),
            BuildSystem::Gradle => ("pitest.targetClasses", "pitest.targetTests"),
        };
        let properties = [
            (classes_key, &options.target_classes),
            (tests_key, &options.target_tests),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            let value = strip_whitespace(value);
            (!value.is_empty()).then(|| (name.to_string(), value))
        })
        .collect();

        BuildCommand {
            build_system,
            goals,
            properties,
        }
    }

    /// Submodule qualifier for action tokens and the Gradle task (`:app`).
    ///
    /// Only set when the working unit is nested below a root that has more
    /// than one child. The Maven mutation goal itself is never qualified.
    pub fn module_prefix(&self, options: &MutationCoverageOptions) -> Option<String> {
        let unit = self.tree.get(options.working_unit)?;
        if unit.is_root() {
            return None;
        }
        let root = self.tree.root_of(unit.id)?;
        (root.children.len() > 1).then(|| format!(":{}", unit.name))
    }
}

/// Collapses whitespace runs and, given a module prefix, qualifies every
/// token that is not already absolute (`clean` -> `:app:clean`).
pub fn normalize_actions(actions: &str, module_prefix: Option<&str>) -> String {
    action_tokens(actions, module_prefix).join(" ")
}

fn action_tokens(actions: &str, module_prefix: Option<&str>) -> Vec<String> {
    actions
        .split_whitespace()
        .map(|token| qualify(token, module_prefix))
        .collect()
}

fn qualify(token: &str, module_prefix: Option<&str>) -> String {
    match module_prefix {
        Some(prefix) if !token.starts_with(':') => format!("{prefix}:{token}"),
        _ => token.to_string(),
    }
}

// Target lists are edited by hand; PIT rejects embedded spaces.
fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
