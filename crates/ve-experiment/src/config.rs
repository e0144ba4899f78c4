//! Runner configuration

/// Program invoked when nothing else is configured
pub const DEFAULT_TOOL: &str = "ve_run";

/// Environment variable overriding the tool program
pub const TOOL_ENV_VAR: &str = "VE_RUN_TOOL";

/// How the external tool is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Program name or path of the external tool
    pub program: String,
}

impl RunnerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With tool program
    #[inline]
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Default configuration, with `VE_RUN_TOOL` applied when set
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Default configuration, with overrides read through `lookup`
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(TOOL_ENV_VAR).filter(|program| !program.trim().is_empty()) {
            Some(program) => Self::new().with_program(program),
            None => Self::new(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_TOOL.to_string(),
        }
    }
}
