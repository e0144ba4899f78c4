//! Error types for VE experiments
//!
//! Three failure kinds, each surfaced by the operation that detects it:
//! - Malformed specifications, at construction/flatten time
//! - Output paths that do not encode this experiment's parameters, before
//!   any subprocess is spawned
//! - External tool failures, as reported by the runner

use crate::path::PathError;

/// Main experiment error type
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// Parameter specification is malformed
    #[error("invalid parameter specification: {0}")]
    Spec(#[from] SpecError),

    /// Output path does not match the parameter layout
    #[error("output path mismatch: {0}")]
    PathMismatch(#[from] PathMismatch),

    /// External tool could not be run or failed
    #[error("run failed: {0}")]
    Run(#[from] RunError),

    /// `run` expects exactly one input and one output
    #[error("expected exactly one {role} path, got {found}")]
    Arity {
        /// Which argument was wrong (`input` or `output`)
        role: &'static str,
        /// Number of paths supplied
        found: usize,
    },
}

impl ExperimentError {
    /// Check if error comes from the parameter specification
    #[inline]
    #[must_use]
    pub fn is_spec_error(&self) -> bool {
        matches!(self, Self::Spec(_))
    }

    /// Check if error is an output path that could not be parsed
    #[inline]
    #[must_use]
    pub fn is_path_mismatch(&self) -> bool {
        matches!(self, Self::PathMismatch(_))
    }

    /// Check if error was reported by the external tool
    #[inline]
    #[must_use]
    pub fn is_run_failure(&self) -> bool {
        matches!(self, Self::Run(_))
    }
}

/// Malformed parameter specification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// Top-level document is not a mapping
    #[error("specification root must be a mapping, found {found}")]
    RootNotAMapping { found: &'static str },

    /// A component's value is a scalar or sequence instead of a mapping
    #[error("component '{path}' must be a mapping, found {found}")]
    NotAMapping { path: String, found: &'static str },

    /// A mapping holds `param` next to other keys
    #[error("component '{path}' mixes 'param' with sub-components {others:?}")]
    MixedLeaf { path: String, others: Vec<String> },

    /// A component has neither `param` nor sub-components
    #[error("component '{path}' has no 'param' leaf")]
    EmptyComponent { path: String },

    /// A value is not a scalar
    #[error("parameter '{path}' has unsupported value {found}")]
    InvalidValue { path: String, found: String },

    /// A rendered value would not survive as a single path segment
    #[error("parameter '{path}' value '{value}' contains a path separator")]
    UnrenderableValue { path: String, value: String },

    /// Two branches resolve to the same dotted path
    #[error("duplicate parameter path '{0}'")]
    DuplicatePath(String),

    /// Two dotted paths share a wildcard placeholder
    #[error("parameters '{first}' and '{second}' share placeholder '{placeholder}'")]
    PlaceholderCollision {
        first: String,
        second: String,
        placeholder: String,
    },

    /// A component name is not usable
    #[error("invalid component name under '{parent}': {source}")]
    InvalidName {
        parent: String,
        #[source]
        source: PathError,
    },
}

/// Output path that does not encode this experiment's parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathMismatch {
    /// Fewer segments than parameters
    #[error("'{path}' has {found} segments, need at least {expected}")]
    TooFewSegments {
        path: String,
        expected: usize,
        found: usize,
    },

    /// A segment does not carry the expected `<dotted_path>_` prefix
    #[error("segment '{segment}' of '{path}' does not match parameter '{param}'")]
    UnexpectedSegment {
        path: String,
        param: String,
        segment: String,
    },

    /// A segment is not valid UTF-8
    #[error("'{path}' contains a segment that is not valid UTF-8")]
    NonUtf8 { path: String },
}

/// External tool failure
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Process could not be started
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited unsuccessfully
    #[error("'{program}' exited with {}", exit_description(.code))]
    Failed { program: String, code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}
