//! Virtual experiment: a base directory plus a parameter specification

use crate::assignment::Assignment;
use crate::config::RunnerConfig;
use crate::error::{ExperimentError, PathMismatch, SpecError};
use crate::expand::{expand_outputs, Combinations};
use crate::flatten::ParamSet;
use crate::runner::{SubprocessRunner, ToolInvocation, ToolRunner};
use crate::spec::ParamSpec;
use crate::template::outpath_with_wildcards;
use std::path::{Path, PathBuf};

/// One parameter sweep
///
/// Immutable after construction. The specification is flattened once, in
/// [`VeExperiment::new`], so malformed specifications fail there; every
/// path-producing and path-consuming method reads the same [`ParamSet`].
#[derive(Debug, Clone)]
pub struct VeExperiment<R = SubprocessRunner> {
    base: PathBuf,
    spec: ParamSpec,
    params: ParamSet,
    config: RunnerConfig,
    runner: R,
}

impl VeExperiment {
    /// Experiment running the default tool as a subprocess
    ///
    /// # Errors
    /// Returns [`SpecError`] if the specification cannot be flattened
    pub fn new(base: impl Into<PathBuf>, spec: ParamSpec) -> Result<Self, SpecError> {
        Self::with_runner(base, spec, RunnerConfig::default(), SubprocessRunner)
    }
}

impl<R: ToolRunner> VeExperiment<R> {
    /// Experiment with explicit configuration and runner
    ///
    /// # Errors
    /// Returns [`SpecError`] if the specification cannot be flattened
    pub fn with_runner(
        base: impl Into<PathBuf>,
        spec: ParamSpec,
        config: RunnerConfig,
        runner: R,
    ) -> Result<Self, SpecError> {
        let params = ParamSet::flatten(&spec)?;
        Ok(Self {
            base: base.into(),
            spec,
            params,
            config,
            runner,
        })
    }

    /// Replace the runner configuration
    #[must_use]
    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Base output directory
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Specification as given
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &ParamSpec {
        &self.spec
    }

    /// Flattened parameters
    #[inline]
    #[must_use]
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Runner configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Tool runner
    #[inline]
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Templated output path, e.g. `out/a.param_{a_param}/b.c.param_{b_c_param}`
    #[must_use]
    pub fn outpath(&self) -> PathBuf {
        outpath_with_wildcards(&self.base, self.params.paths())
    }

    /// The experiment's output: its templated path
    #[inline]
    #[must_use]
    pub fn output(&self) -> PathBuf {
        self.outpath()
    }

    /// Every concrete output path, one per combination
    #[must_use]
    pub fn all_outputs(&self) -> Vec<PathBuf> {
        expand_outputs(&self.base, &self.params)
    }

    /// Lazy iterator over every combination
    #[inline]
    #[must_use]
    pub fn combinations(&self) -> Combinations<'_> {
        Combinations::new(&self.params)
    }

    /// Number of combinations, `None` on overflow
    #[inline]
    #[must_use]
    pub fn combination_count(&self) -> Option<usize> {
        self.params.combination_count()
    }

    /// Concrete output path for one combination
    #[inline]
    #[must_use]
    pub fn output_for(&self, assignment: &Assignment) -> PathBuf {
        assignment.to_path(&self.base)
    }

    /// Recover the assignment encoded in a concrete output path
    ///
    /// # Errors
    /// Returns [`PathMismatch`] if the path does not end in one segment per
    /// parameter in this experiment's order
    pub fn parse_output(&self, output: impl AsRef<Path>) -> Result<Assignment, PathMismatch> {
        Assignment::from_output_path(&self.params, output.as_ref())
    }

    /// Tool invocation for one `(input, output)` pair, without running it
    ///
    /// # Errors
    /// Returns [`ExperimentError::Arity`] unless both slices hold exactly one
    /// path, or [`ExperimentError::PathMismatch`] if `output` cannot be parsed
    pub fn invocation<I, O>(
        &self,
        input: &[I],
        output: &[O],
    ) -> Result<ToolInvocation, ExperimentError>
    where
        I: AsRef<Path>,
        O: AsRef<Path>,
    {
        let input = single("input", input)?;
        let output = single("output", output)?;
        let assignment = self.parse_output(output)?;
        Ok(ToolInvocation::for_assignment(
            &self.config,
            input,
            output,
            &assignment,
        ))
    }

    /// Run the external tool for one concrete output path
    ///
    /// Blocks until the tool exits. Nothing is spawned if `output` cannot be
    /// parsed.
    ///
    /// # Errors
    /// Returns [`ExperimentError`] for arity or path mismatches, or the
    /// runner's [`RunError`](crate::RunError) if the tool fails
    pub fn run<I, O>(&self, input: &[I], output: &[O]) -> Result<(), ExperimentError>
    where
        I: AsRef<Path>,
        O: AsRef<Path>,
    {
        let invocation = self.invocation(input, output)?;
        self.runner.run(&invocation)?;
        Ok(())
    }
}

fn single<'a, T: AsRef<Path>>(
    role: &'static str,
    items: &'a [T],
) -> Result<&'a Path, ExperimentError> {
    match items {
        [item] => Ok(item.as_ref()),
        _ => Err(ExperimentError::Arity {
            role,
            found: items.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunError;
    use crate::runner::MockToolRunner;
    use crate::value::ValueSet;
    use mockall::predicate::always;

    fn spec() -> ParamSpec {
        ParamSpec::new()
            .with_param(["b", "c"], ValueSet::range(2..4))
            .unwrap()
            .with_param(["a"], ValueSet::range(0..2))
            .unwrap()
    }

    fn experiment_with(runner: MockToolRunner) -> VeExperiment<MockToolRunner> {
        VeExperiment::with_runner("out", spec(), RunnerConfig::default(), runner).unwrap()
    }

    #[test]
    fn outpath_equals_output() {
        let exp = VeExperiment::new("out", spec()).unwrap();
        assert_eq!(
            exp.outpath(),
            PathBuf::from("out/a.param_{a_param}/b.c.param_{b_c_param}")
        );
        assert_eq!(exp.outpath(), exp.output());
    }

    #[test]
    fn run_invokes_tool_once_with_sorted_assignments() {
        let mut runner = MockToolRunner::new();
        runner
            .expect_run()
            .withf(|inv| {
                inv.program() == "ve_run"
                    && inv.args_lossy()
                        == [
                            "-o",
                            "out/a.param_1/b.c.param_2",
                            "-c",
                            "a.param=1",
                            "-c",
                            "b.c.param=2",
                            "dataset",
                        ]
            })
            .times(1)
            .returning(|_| Ok(()));

        let exp = experiment_with(runner);
        exp.run(&["dataset"], &["out/a.param_1/b.c.param_2"]).unwrap();
    }

    #[test]
    fn run_propagates_tool_failure() {
        let mut runner = MockToolRunner::new();
        runner.expect_run().with(always()).times(1).returning(|_| {
            Err(RunError::Failed {
                program: "ve_run".into(),
                code: Some(2),
            })
        });

        let exp = experiment_with(runner);
        let err = exp
            .run(&["dataset"], &["out/a.param_0/b.c.param_3"])
            .unwrap_err();
        assert!(err.is_run_failure());
    }

    #[test]
    fn mismatched_output_spawns_nothing() {
        let mut runner = MockToolRunner::new();
        runner.expect_run().times(0);

        let exp = experiment_with(runner);
        let err = exp
            .run(&["dataset"], &["out/b.c.param_2/a.param_1"])
            .unwrap_err();
        assert!(err.is_path_mismatch());
    }

    #[test]
    fn run_requires_single_paths() {
        let mut runner = MockToolRunner::new();
        runner.expect_run().times(0);

        let exp = experiment_with(runner);
        let err = exp
            .run(&["a", "b"], &["out/a.param_1/b.c.param_2"])
            .unwrap_err();
        assert!(matches!(err, ExperimentError::Arity { role: "input", found: 2 }));

        let none: [&str; 0] = [];
        let err = exp.run(&["dataset"], &none).unwrap_err();
        assert!(matches!(err, ExperimentError::Arity { role: "output", found: 0 }));
    }

    #[test]
    fn malformed_spec_fails_at_construction() {
        let spec = ParamSpec::from_json(&serde_json::json!({"a": {}})).unwrap();
        let err = VeExperiment::new("out", spec).unwrap_err();
        assert_eq!(err, SpecError::EmptyComponent { path: "a".into() });
    }

    #[test]
    fn config_selects_program() {
        let exp = VeExperiment::new("out", spec())
            .unwrap()
            .with_config(RunnerConfig::new().with_program("my_tool"));
        let invocation = exp
            .invocation(&["dataset"], &["out/a.param_0/b.c.param_2"])
            .unwrap();
        assert_eq!(invocation.program(), "my_tool");
    }
}
