use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::invocation::BuildInvocation;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// What the build tool printed, and how it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Executes a planned [`BuildInvocation`].
///
/// Tests substitute a recording implementation; the CLI uses
/// [`DefaultCommandRunner`].
pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    fn run(&self, invocation: &BuildInvocation) -> io::Result<CommandOutput>;
}

/// Spawns the build tool as a child process.
///
/// Output goes to anonymous temp files instead of pipes, so a chatty build
/// can never block on a full pipe buffer while we wait for it.
#[derive(Debug, Clone, Default)]
pub struct DefaultCommandRunner {
    /// Kill the build tool once it runs longer than this. Forked test JVMs or
    /// Gradle daemons started by the tool are not tracked.
    pub timeout: Option<Duration>,
}

impl DefaultCommandRunner {
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for DefaultCommandRunner {
    fn run(&self, invocation: &BuildInvocation) -> io::Result<CommandOutput> {
        let command_line = invocation.command_line();
        let mut stdout = tempfile::tempfile()?;
        let mut stderr = tempfile::tempfile()?;

        tracing::debug!(
            target: "pitkit.build",
            cwd = %invocation.working_dir.display(),
            command = %command_line,
            jvm_options = ?invocation.jvm_options,
            "starting build tool"
        );
        let mut child = Command::new(&invocation.program)
            .args(invocation.args())
            .envs(invocation.env())
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(stdout.try_clone()?)
            .stderr(stderr.try_clone()?)
            .spawn()
            .map_err(|err| {
                io::Error::new(err.kind(), format!("could not start `{command_line}`: {err}"))
            })?;

        let status = match self.timeout {
            None => child.wait()?,
            Some(limit) => match wait_until(&mut child, Instant::now() + limit)? {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let partial = read_back(&mut stderr).unwrap_or_default();
                    tracing::warn!(target: "pitkit.build", command = %command_line, ?limit, "build tool timed out");
                    return Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!(
                            "`{command_line}` did not finish within {limit:?}{}",
                            last_lines(&partial, 20)
                        ),
                    ));
                }
            },
        };

        tracing::debug!(target: "pitkit.build", code = ?status.code(), "build tool exited");
        Ok(CommandOutput {
            status,
            stdout: read_back(&mut stdout)?,
            stderr: read_back(&mut stderr)?,
        })
    }
}

/// Polls `child` until it exits or `deadline` passes (`Ok(None)`).
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(None);
        }
        thread::sleep(remaining.min(POLL_INTERVAL));
    }
}

fn read_back(file: &mut File) -> io::Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let tail = &lines[lines.len().saturating_sub(count)..];
    format!("\n{}", tail.join("\n"))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pitkit_model::BuildSystem;
    use std::path::{Path, PathBuf};

    fn shell(dir: &Path, script: &str, jvm_options: Option<&str>) -> BuildInvocation {
        BuildInvocation {
            build_system: BuildSystem::Maven,
            program: PathBuf::from("sh"),
            working_dir: dir.to_path_buf(),
            goals: vec!["-c".to_string(), script.to_string()],
            properties: Vec::new(),
            jvm_options: jvm_options.map(str::to_string),
        }
    }

    #[test]
    fn captures_both_streams_and_passes_jvm_options() {
        let dir = tempfile::tempdir().unwrap();
        let output = DefaultCommandRunner::default()
            .run(&shell(
                dir.path(),
                "echo \"$MAVEN_OPTS\"; echo oops >&2",
                Some("-Xmx1g"),
            ))
            .unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, "-Xmx1g\n");
        assert_eq!(output.stderr, "oops\n");
    }

    #[test]
    fn runs_in_the_planned_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        let output = DefaultCommandRunner::default()
            .run(&shell(dir.path(), "ls", None))
            .unwrap();
        assert_eq!(output.stdout, "pom.xml\n");
    }

    #[test]
    fn large_output_does_not_stall() {
        let dir = tempfile::tempdir().unwrap();
        let output = DefaultCommandRunner::with_timeout(Some(Duration::from_secs(30)))
            .run(&shell(dir.path(), "seq 1 200000", None))
            .unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout.lines().count(), 200000);
    }

    #[test]
    fn timeout_kills_the_tool_and_keeps_its_last_words() {
        let dir = tempfile::tempdir().unwrap();
        let err = DefaultCommandRunner::with_timeout(Some(Duration::from_millis(200)))
            .run(&shell(dir.path(), "echo compiling >&2; sleep 5", None))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        assert!(err.to_string().ends_with("\ncompiling"), "{err}");
    }

    #[test]
    fn missing_program_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut invocation = shell(dir.path(), "true", None);
        invocation.program = PathBuf::from("pitkit-no-such-build-tool");
        let err = DefaultCommandRunner::default().run(&invocation).unwrap_err();
        assert!(err.to_string().contains("could not start"));
    }
}
