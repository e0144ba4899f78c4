//! `ve-sweep`: print sweep paths and run the external tool per combination.

mod commands;
mod spec_file;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use ve_experiment::{RunnerConfig, VeExperiment};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn experiment_args() -> [Arg; 2] {
    [
        Arg::new("params")
            .long("params")
            .short('p')
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Parameter specification file (.json or YAML)"),
        Arg::new("base")
            .long("base")
            .short('b')
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Base output directory"),
    ]
}

fn tool_args() -> [Arg; 2] {
    [
        Arg::new("tool")
            .long("tool")
            .help("External tool program (overrides VE_RUN_TOOL)"),
        Arg::new("dry-run")
            .long("dry-run")
            .action(ArgAction::SetTrue)
            .help("Print the command line instead of running it"),
    ]
}

fn input_arg() -> Arg {
    Arg::new("input")
        .long("input")
        .short('i')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Input dataset passed to the tool")
}

fn cli() -> Command {
    Command::new("ve-sweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Virtual-experiment parameter sweeps")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("outpath")
                .about("Print the templated output path")
                .args(experiment_args()),
        )
        .subcommand(
            Command::new("outputs")
                .about("Print every concrete output path")
                .args(experiment_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Run the tool for one concrete output path")
                .args(experiment_args())
                .args(tool_args())
                .arg(input_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Concrete output path"),
                ),
        )
        .subcommand(
            Command::new("sweep")
                .about("Run the tool for every combination, in order")
                .args(experiment_args())
                .args(tool_args())
                .arg(input_arg()),
        )
}

fn path_arg<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(id)
        .with_context(|| format!("missing --{id}"))
}

fn build_experiment(args: &ArgMatches) -> Result<VeExperiment> {
    let spec = spec_file::load_spec(path_arg(args, "params")?)?;

    let mut config = RunnerConfig::from_env();
    if let Ok(Some(tool)) = args.try_get_one::<String>("tool") {
        config = config.with_program(tool);
    }

    let exp = VeExperiment::new(path_arg(args, "base")?, spec)
        .context("invalid parameter specification")?
        .with_config(config);
    tracing::debug!(
        "Experiment with {} parameters, tool '{}'",
        exp.params().len(),
        exp.config().program
    );
    Ok(exp)
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_logging();

    let matches = cli().get_matches();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match matches.subcommand() {
        Some(("outpath", args)) => commands::outpath(&build_experiment(args)?, &mut out),
        Some(("outputs", args)) => {
            commands::outputs(&build_experiment(args)?, args.get_flag("json"), &mut out)
        }
        Some(("run", args)) => commands::run_one(
            &build_experiment(args)?,
            path_arg(args, "input")?,
            path_arg(args, "output")?,
            args.get_flag("dry-run"),
            &mut out,
        ),
        Some(("sweep", args)) => commands::sweep(
            &build_experiment(args)?,
            path_arg(args, "input")?,
            args.get_flag("dry-run"),
            &mut out,
        ),
        Some((other, _)) => anyhow::bail!("unknown subcommand: {other}"),
        None => anyhow::bail!("no subcommand given"),
    }
}
