//! Typed descriptions of the external commands a release runs
//!
//! Every subprocess is described by a [`CommandSpec`] and executed by a
//! [`CommandRunner`]. The runner reports a structured [`CommandOutput`];
//! [`run_checked`] turns anything but success into
//! [`GenError::ExternalToolFailure`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::trace;

use crate::utils::error::{GenError, GenResult};

/// Which part of the release a command belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Purge previous build artifacts
    Clean,
    /// Cross-compile for one target
    Build,
    /// Produce a detached signature
    Sign,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Clean => write!(f, "clean"),
            Step::Build => write!(f, "build"),
            Step::Sign => write!(f, "sign"),
        }
    }
}

/// A subprocess invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub step: Step,
    /// Target platform the command works on, if any
    pub platform: Option<String>,
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; inherits the current one when `None`
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of streaming them to the terminal
    pub capture: bool,
}

impl CommandSpec {
    pub fn new(step: Step, program: impl Into<String>) -> Self {
        Self {
            step,
            platform: None,
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn for_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What a finished command reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
    pub success: bool,
    /// Empty unless the command was captured
    pub stdout: String,
    /// Empty unless the command was captured
    pub stderr: String,
}

impl CommandOutput {
    pub fn succeeded() -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn from_status(status: ExitStatus, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self {
            code: status.code(),
            success: status.success(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        }
    }

    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Executes command descriptors
pub trait CommandRunner {
    /// Run `spec` to completion. An `Err` means the command could not be
    /// started at all; a non-zero exit is reported through [`CommandOutput`].
    fn run(&mut self, spec: &CommandSpec) -> GenResult<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, spec: &CommandSpec) -> GenResult<CommandOutput> {
        (**self).run(spec)
    }
}

/// Run `spec` and fail unless it succeeded.
pub fn run_checked(runner: &mut impl CommandRunner, spec: &CommandSpec) -> GenResult<CommandOutput> {
    trace!("running {} ({})", spec, spec.step);
    let output = runner.run(spec)?;
    if output.success {
        Ok(output)
    } else {
        Err(GenError::ExternalToolFailure {
            step: spec.step.to_string(),
            platform: spec.platform.clone(),
            status: format!("`{}` {}", spec, output.status_text()),
            stderr: output.stderr,
        })
    }
}

/// Runs commands as real subprocesses
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, spec: &CommandSpec) -> GenResult<CommandOutput> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(ref cwd) = spec.cwd {
            cmd.current_dir(cwd);
        }

        let not_started = |e: std::io::Error| GenError::ExternalToolFailure {
            step: spec.step.to_string(),
            platform: spec.platform.clone(),
            status: format!("could not start `{}`: {}", spec.program, e),
            stderr: String::new(),
        };

        if spec.capture {
            let output = cmd.output().map_err(not_started)?;
            Ok(CommandOutput::from_status(output.status, output.stdout, output.stderr))
        } else {
            let status = cmd
                .stdin(Stdio::null())
                .status()
                .map_err(not_started)?;
            Ok(CommandOutput::from_status(status, Vec::new(), Vec::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(CommandOutput);

    impl CommandRunner for Fixed {
        fn run(&mut self, _spec: &CommandSpec) -> GenResult<CommandOutput> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_spec_builder_and_display() {
        let spec = CommandSpec::new(Step::Build, "cargo")
            .args(["+stable", "zigbuild"])
            .arg("--release")
            .for_platform("x86_64-unknown-linux-musl");
        assert_eq!(spec.to_string(), "cargo +stable zigbuild --release");
        assert_eq!(spec.platform.as_deref(), Some("x86_64-unknown-linux-musl"));
        assert!(!spec.capture);
        assert!(spec.cwd.is_none());
    }

    #[test]
    fn test_run_checked_success() {
        let spec = CommandSpec::new(Step::Clean, "cargo").arg("clean");
        let out = run_checked(&mut Fixed(CommandOutput::succeeded()), &spec).unwrap();
        assert!(out.success);
    }

    #[test]
    fn test_run_checked_failure_carries_context() {
        let spec = CommandSpec::new(Step::Sign, "gpg")
            .arg("--detach-sign")
            .for_platform("aarch64-apple-darwin");
        let err = run_checked(&mut Fixed(CommandOutput::failed(2, "no secret key")), &spec)
            .unwrap_err();
        match err {
            GenError::ExternalToolFailure {
                step,
                platform,
                status,
                stderr,
            } => {
                assert_eq!(step, "sign");
                assert_eq!(platform.as_deref(), Some("aarch64-apple-darwin"));
                assert_eq!(status, "`gpg --detach-sign` exit status: 2");
                assert_eq!(stderr, "no secret key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_status_text_for_signal() {
        let out = CommandOutput {
            code: None,
            success: false,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(out.status_text(), "terminated by signal");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures() {
        let spec = CommandSpec::new(Step::Clean, "sh")
            .args(["-c", "echo out; echo err >&2; exit 3"])
            .captured();
        let out = SystemRunner.run(&spec).unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[test]
    fn test_system_runner_missing_program() {
        let spec = CommandSpec::new(Step::Build, "definitely-not-a-real-program-7f3a");
        let err = SystemRunner.run(&spec).unwrap_err();
        assert!(err.to_string().contains("could not start"));
    }
}
