//! VE Experiment
//!
//! Output paths and tool invocations for virtual-experiment parameter sweeps.
//!
//! # Core Concepts
//!
//! - [`ParamSpec`]: nested parameter specification with `param` leaves
//! - [`ParamSet`]: flattened parameters in ascending dotted-path order
//! - [`outpath_with_wildcards`]: templated output path, one wildcard per parameter
//! - [`Combinations`]: Cartesian product of all value sets as [`Assignment`]s
//! - [`VeExperiment`]: base directory + specification, with `outpath`,
//!   `all_outputs` and `run`
//!
//! # Example
//!
//! ```rust
//! use std::path::PathBuf;
//! use ve_experiment::{ParamSpec, ValueSet, VeExperiment};
//!
//! let spec = ParamSpec::new()
//!     .with_param(["b", "c"], ValueSet::range(2..4))?
//!     .with_param(["a"], ValueSet::range(0..2))?;
//! let exp = VeExperiment::new("out", spec)?;
//!
//! assert_eq!(
//!     exp.outpath(),
//!     PathBuf::from("out/a.param_{a_param}/b.c.param_{b_c_param}")
//! );
//! assert_eq!(exp.all_outputs().len(), 4);
//!
//! let invocation = exp.invocation(&["dataset"], &["out/a.param_1/b.c.param_2"])?;
//! assert_eq!(
//!     invocation.to_string(),
//!     "ve_run -o out/a.param_1/b.c.param_2 -c a.param=1 -c b.c.param=2 dataset"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod assignment;
mod config;
mod error;
mod expand;
mod experiment;
mod flatten;
mod path;
mod runner;
mod spec;
mod template;
mod value;

// Re-exports
pub use assignment::Assignment;
pub use config::{RunnerConfig, DEFAULT_TOOL, TOOL_ENV_VAR};
pub use error::{ExperimentError, PathMismatch, RunError, SpecError};
pub use expand::{expand_outputs, Combinations};
pub use experiment::VeExperiment;
pub use flatten::ParamSet;
pub use path::{validate_component, ParamPath, PathError, PARAM_KEY};
pub use runner::{SubprocessRunner, ToolInvocation, ToolRunner, CONFIG_FLAG, OUTPUT_FLAG};
pub use spec::{ParamSpec, SpecNode};
pub use template::outpath_with_wildcards;
pub use value::{ParamValue, ValueSet};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and running experiments
    pub use crate::{
        Assignment, ExperimentError, ParamSpec, RunnerConfig, ToolRunner, ValueSet,
        VeExperiment,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
