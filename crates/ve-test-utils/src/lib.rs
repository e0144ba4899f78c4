//! Testing utilities for the VE sweep workspace
//!
//! Shared fixtures and a recording tool runner.

#![allow(missing_docs)]

use parking_lot::Mutex;
use serde_json::json;
use std::path::PathBuf;
use ve_experiment::{
    ParamSpec, RunError, RunnerConfig, ToolInvocation, ToolRunner, VeExperiment,
};

/// `{"b": {"c": {"param": [2, 3]}}, "a": {"param": [0, 1]}}`, deliberately
/// not in alphabetical order.
pub fn sweep_spec_json() -> serde_json::Value {
    json!({
        "b": {"c": {"param": [2, 3]}},
        "a": {"param": [0, 1]},
    })
}

pub fn sweep_spec() -> ParamSpec {
    ParamSpec::from_json(&sweep_spec_json()).unwrap()
}

pub fn single_param_spec() -> ParamSpec {
    ParamSpec::from_json(&json!({"a": {"param": [0, 1]}})).unwrap()
}

/// Runner that records every invocation instead of spawning
///
/// Fails with the configured exit code when one is set.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<ToolInvocation>>,
    fail_with: Option<i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(code: i32) -> Self {
        Self {
            calls: Mutex::default(),
            fail_with: Some(code),
        }
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().clone()
    }

    pub fn call_args(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .iter()
            .map(ToolInvocation::args_lossy)
            .collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<(), RunError> {
        self.calls.lock().push(invocation.clone());
        match self.fail_with {
            Some(code) => Err(RunError::Failed {
                program: invocation.program().to_string_lossy().into_owned(),
                code: Some(code),
            }),
            None => Ok(()),
        }
    }
}

pub fn recording_experiment(
    base: impl Into<PathBuf>,
    spec: ParamSpec,
) -> VeExperiment<RecordingRunner> {
    VeExperiment::with_runner(base, spec, RunnerConfig::default(), RecordingRunner::new()).unwrap()
}

pub fn failing_experiment(
    base: impl Into<PathBuf>,
    spec: ParamSpec,
    code: i32,
) -> VeExperiment<RecordingRunner> {
    VeExperiment::with_runner(base, spec, RunnerConfig::default(), RecordingRunner::failing(code))
        .unwrap()
}
