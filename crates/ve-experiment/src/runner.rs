//! External tool invocation
//!
//! [`ToolInvocation`] is the exact command line for one combination;
//! [`ToolRunner`] executes it. The default runner blocks on a
//! `std::process` child and maps a non-zero exit to [`RunError::Failed`].

use crate::assignment::Assignment;
use crate::config::RunnerConfig;
use crate::error::RunError;
use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::process::Command;

/// Flag preceding the output path
pub const OUTPUT_FLAG: &str = "-o";

/// Flag preceding each `<dotted_path>=<value>` assignment
pub const CONFIG_FLAG: &str = "-c";

/// Program and arguments of one tool run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: OsString,
    args: Vec<OsString>,
}

impl ToolInvocation {
    /// Invocation of `program` with no arguments
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// `<program> -o <output> -c <p1>=<v1> ... <input>`
    #[must_use]
    pub fn for_assignment(
        config: &RunnerConfig,
        input: &Path,
        output: &Path,
        assignment: &Assignment,
    ) -> Self {
        let invocation = Self::new(&config.program)
            .arg(OUTPUT_FLAG)
            .arg(output);
        assignment
            .config_args()
            .fold(invocation, |acc, pair| acc.arg(CONFIG_FLAG).arg(pair))
            .arg(input)
    }

    /// Program to execute
    #[inline]
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments, excluding the program
    #[inline]
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments as lossy UTF-8, for assertions and logs
    #[must_use]
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    /// `std::process` command for this invocation
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl Display for ToolInvocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes tool invocations
#[cfg_attr(test, mockall::automock)]
pub trait ToolRunner {
    /// Run to completion
    ///
    /// # Errors
    /// Returns [`RunError`] if the process cannot be started or does not
    /// exit successfully
    fn run(&self, invocation: &ToolInvocation) -> Result<(), RunError>;
}

impl<R: ToolRunner + ?Sized> ToolRunner for &R {
    fn run(&self, invocation: &ToolInvocation) -> Result<(), RunError> {
        (**self).run(invocation)
    }
}

/// Runs the tool as a child process, inheriting stdio
#[derive(Debug, Clone, Copy, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    /// Create runner
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for SubprocessRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<(), RunError> {
        let program = invocation.program().to_string_lossy().into_owned();
        tracing::info!("Running: {}", invocation);

        let status = invocation
            .to_command()
            .status()
            .map_err(|source| RunError::Spawn {
                program: program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            tracing::error!("{} exited with {}", program, status);
            Err(RunError::Failed {
                program,
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::ParamSet;
    use crate::spec::ParamSpec;

    fn assignment() -> Assignment {
        let spec = ParamSpec::new()
            .with_param(["b", "c"], [2, 3])
            .unwrap()
            .with_param(["a"], [0, 1])
            .unwrap();
        let params = ParamSet::flatten(&spec).unwrap();
        Assignment::from_output_path(&params, Path::new("out/a.param_1/b.c.param_2")).unwrap()
    }

    #[test]
    fn builds_exact_argument_list() {
        let invocation = ToolInvocation::for_assignment(
            &RunnerConfig::default(),
            Path::new("dataset"),
            Path::new("out/a.param_1/b.c.param_2"),
            &assignment(),
        );
        assert_eq!(invocation.program(), "ve_run");
        assert_eq!(
            invocation.args_lossy(),
            vec![
                "-o",
                "out/a.param_1/b.c.param_2",
                "-c",
                "a.param=1",
                "-c",
                "b.c.param=2",
                "dataset"
            ]
        );
    }

    #[test]
    fn display_is_command_line() {
        let invocation = ToolInvocation::new("ve_run").arg("-o").arg("out");
        assert_eq!(invocation.to_string(), "ve_run -o out");
    }

    #[test]
    fn mock_runner_sees_invocation() {
        let mut runner = MockToolRunner::new();
        runner
            .expect_run()
            .withf(|inv| inv.program() == "custom" && inv.args_lossy() == ["x"])
            .times(1)
            .returning(|_| Ok(()));

        let invocation = ToolInvocation::new("custom").arg("x");
        assert!(runner.run(&invocation).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn subprocess_success() {
        let invocation = ToolInvocation::new("true").arg("ignored");
        assert!(SubprocessRunner::new().run(&invocation).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn subprocess_failure_is_error() {
        let err = SubprocessRunner::new()
            .run(&ToolInvocation::new("false"))
            .unwrap_err();
        assert!(matches!(err, RunError::Failed { code: Some(1), .. }));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let err = SubprocessRunner::new()
            .run(&ToolInvocation::new("ve-run-does-not-exist-4c1e"))
            .unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }
}
