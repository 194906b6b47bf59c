//! Turns resolved [`MutationCoverageOptions`](pitkit_model::MutationCoverageOptions)
//! into Maven/Gradle command lines and runs them.
//!
//! [`CommandComposer`] renders the human-readable command shown before a run.
//! [`plan_invocation`] produces the structured equivalent (program, working
//! directory, goals, properties, JVM options) that a [`CommandRunner`] executes.

mod command;
mod compose;
mod invocation;

pub use command::{CommandOutput, CommandRunner, DefaultCommandRunner};
pub use compose::{
    normalize_actions, BuildCommand, CommandComposer, ComposeSettings, GRADLE_PITEST_TASK,
    MAVEN_PITEST_GOAL, MAVEN_TEST_COMPILE_GOAL,
};
pub use invocation::{
    plan_invocation, read_jvm_config, run_invocation, BuildInvocation, JVM_CONFIG_FILE,
    MAVEN_OPTS_ENV_VAR,
};

use pitkit_model::BuildUnitId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(
        "{tool} command `{command}` failed with exit code {code:?}\nstdout:\n{stdout}\nstderr:\n{stderr}"
    )]
    CommandFailed {
        tool: &'static str,
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("build unit {0:?} is not part of the current project tree")]
    UnknownUnit(BuildUnitId),
}

pub type Result<T> = std::result::Result<T, BuildError>;
