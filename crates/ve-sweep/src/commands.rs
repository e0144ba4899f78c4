//! Subcommand implementations
//!
//! Each command writes its result to `out` so the binary can target stdout
//! and tests can capture it.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use ve_experiment::{ToolRunner, VeExperiment};

pub(crate) fn outpath<R: ToolRunner>(exp: &VeExperiment<R>, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", exp.outpath().display())?;
    Ok(())
}

pub(crate) fn outputs<R: ToolRunner>(
    exp: &VeExperiment<R>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let outputs = exp.all_outputs();
    if json {
        let rendered: Vec<String> = outputs
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        serde_json::to_writer_pretty(&mut *out, &rendered)?;
        writeln!(out)?;
    } else {
        for path in &outputs {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}

pub(crate) fn run_one<R: ToolRunner>(
    exp: &VeExperiment<R>,
    input: &Path,
    output: &Path,
    dry_run: bool,
    out: &mut impl Write,
) -> Result<()> {
    if dry_run {
        let invocation = exp.invocation(&[input], &[output])?;
        writeln!(out, "{invocation}")?;
        return Ok(());
    }
    exp.run(&[input], &[output])
        .with_context(|| format!("run for {} failed", output.display()))
}

/// Runs every combination in order, stopping at the first failure
pub(crate) fn sweep<R: ToolRunner>(
    exp: &VeExperiment<R>,
    input: &Path,
    dry_run: bool,
    out: &mut impl Write,
) -> Result<()> {
    let total = exp.combination_count().unwrap_or(usize::MAX);
    tracing::info!("Sweeping {} combinations", total);

    for (i, assignment) in exp.combinations().enumerate() {
        let output = exp.output_for(&assignment);
        run_one(exp, input, &output, dry_run, out)
            .with_context(|| format!("combination {} of {}", i + 1, total))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ve_test_utils::{failing_experiment, recording_experiment, sweep_spec};

    fn capture(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn prints_outpath() {
        let exp = recording_experiment("out", sweep_spec());
        let text = capture(|out| outpath(&exp, out));
        assert_eq!(text, "out/a.param_{a_param}/b.c.param_{b_c_param}\n");
    }

    #[test]
    fn prints_outputs_as_lines_and_json() {
        let exp = recording_experiment("out", sweep_spec());
        let text = capture(|out| outputs(&exp, false, out));
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().any(|l| l == "out/a.param_1/b.c.param_3"));

        let json = capture(|out| outputs(&exp, true, out));
        let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 4);
    }

    #[test]
    fn dry_run_prints_command_without_running() {
        let exp = recording_experiment("out", sweep_spec());
        let text = capture(|out| {
            run_one(
                &exp,
                Path::new("dataset"),
                Path::new("out/a.param_1/b.c.param_2"),
                true,
                out,
            )
        });
        assert_eq!(
            text,
            "ve_run -o out/a.param_1/b.c.param_2 -c a.param=1 -c b.c.param=2 dataset\n"
        );
        assert!(exp.runner().calls().is_empty());
    }

    #[test]
    fn sweep_runs_every_combination() {
        let exp = recording_experiment("out", sweep_spec());
        capture(|out| sweep(&exp, Path::new("dataset"), false, out));

        let outputs: Vec<String> = exp
            .runner()
            .call_args()
            .into_iter()
            .map(|args| args[1].clone())
            .collect();
        assert_eq!(
            outputs,
            vec![
                "out/a.param_0/b.c.param_2",
                "out/a.param_0/b.c.param_3",
                "out/a.param_1/b.c.param_2",
                "out/a.param_1/b.c.param_3",
            ]
        );
    }

    #[test]
    fn sweep_stops_at_first_failure() {
        let exp = failing_experiment("out", sweep_spec(), 2);
        let mut buf = Vec::new();
        let err = sweep(&exp, Path::new("dataset"), false, &mut buf).unwrap_err();
        assert_eq!(exp.runner().calls().len(), 1);
        assert!(format!("{err:#}").contains("combination 1 of 4"));
    }
}
