use std::path::{Path, PathBuf};

use pitkit_config::PitkitConfig;
use pitkit_model::{BuildSystem, BuildUnitTree, MutationCoverageOptions};
use serde::Serialize;

use crate::command::{CommandOutput, CommandRunner};
use crate::compose::{render_arguments, CommandComposer, ComposeSettings};
use crate::{BuildError, Result};

/// Maven JVM options file, relative to a unit directory.
pub const JVM_CONFIG_FILE: &str = ".mvn/jvm.config";

/// Environment variable Maven reads extra JVM options from.
pub const MAVEN_OPTS_ENV_VAR: &str = "MAVEN_OPTS";

/// A fully planned build-tool run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInvocation {
    pub build_system: BuildSystem,
    pub program: PathBuf,
    pub working_dir: PathBuf,
    pub goals: Vec<String>,
    pub properties: Vec<(String, String)>,
    /// Combined `.mvn/jvm.config` contents (Maven only).
    pub jvm_options: Option<String>,
}

impl BuildInvocation {
    pub fn args(&self) -> Vec<String> {
        render_arguments(self.build_system, &self.goals, &self.properties)
    }

    pub fn env(&self) -> Vec<(String, String)> {
        self.jvm_options
            .iter()
            .map(|options| (MAVEN_OPTS_ENV_VAR.to_string(), options.clone()))
            .collect()
    }

    /// Shell-style rendering for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Decides program, working directory and JVM options for a run of `options`.
pub fn plan_invocation(
    options: &MutationCoverageOptions,
    tree: &BuildUnitTree,
    config: &PitkitConfig,
) -> Result<BuildInvocation> {
    let unit = tree
        .get(options.working_unit)
        .ok_or(BuildError::UnknownUnit(options.working_unit))?;
    let build_system = options.build_system;

    let composer = CommandComposer::new(
        tree,
        ComposeSettings {
            compile_tests_first: build_system == BuildSystem::Maven
                && config.maven.compile_tests_first,
        },
    );
    let command = composer.command(options, build_system);

    let (working_dir, program, jvm_options) = match build_system {
        BuildSystem::Maven => {
            let working_dir = unit.directory().to_path_buf();
            let program = if config.maven.prefer_wrapper {
                std::iter::once(unit)
                    .chain(tree.ancestors(unit.id))
                    .find_map(|candidate| find_wrapper(candidate.directory(), build_system))
            } else {
                None
            };
            let jvm_options = read_jvm_config(&unit.directory().join(JVM_CONFIG_FILE)).or_else(
                || {
                    tree.parent(unit.id).and_then(|parent| {
                        read_jvm_config(&parent.directory().join(JVM_CONFIG_FILE))
                    })
                },
            );
            (working_dir, program, jvm_options)
        }
        BuildSystem::Gradle => {
            let root = tree.root_of(unit.id).unwrap_or(unit);
            let working_dir = root.directory().to_path_buf();
            let program = if config.gradle.prefer_wrapper {
                find_wrapper(root.directory(), build_system)
            } else {
                None
            };
            (working_dir, program, None)
        }
    };

    let invocation = BuildInvocation {
        build_system,
        program: program.unwrap_or_else(|| PathBuf::from(build_system.executable())),
        working_dir,
        goals: command.goals,
        properties: command.properties,
        jvm_options,
    };
    tracing::debug!(
        target: "pitkit.build",
        unit = %unit.name,
        cwd = %invocation.working_dir.display(),
        command = %invocation.command_line(),
        "planned build invocation"
    );
    Ok(invocation)
}

/// Runs a planned invocation; a non-zero exit becomes [`BuildError::CommandFailed`].
pub fn run_invocation(
    invocation: &BuildInvocation,
    runner: &dyn CommandRunner,
) -> Result<CommandOutput> {
    let output = runner.run(invocation)?;
    if !output.status.success() {
        return Err(BuildError::CommandFailed {
            tool: invocation.build_system.executable(),
            command: invocation.command_line(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }
    Ok(output)
}

/// Reads a `jvm.config` file, dropping blank lines and `#` comments.
///
/// Returns `None` when the file is missing, unreadable or has no options.
pub fn read_jvm_config(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let options = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ");
    (!options.is_empty()).then_some(options)
}

fn find_wrapper(dir: &Path, build_system: BuildSystem) -> Option<PathBuf> {
    let name = if cfg!(windows) {
        format!("{}.cmd", build_system.wrapper())
    } else {
        build_system.wrapper().to_string()
    };
    let candidate = dir.join(name);
    candidate.is_file().then_some(candidate)
}
