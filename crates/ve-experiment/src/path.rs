//! Dotted parameter paths
//!
//! Provides [`ParamPath`] for addressing one sweep parameter inside a nested
//! parameter specification, plus the segment encodings derived from it.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Reserved key marking a parameter leaf in a specification.
pub const PARAM_KEY: &str = "param";

/// Separator between the dotted path and the value in a path segment.
const VALUE_SEPARATOR: char = '_';

/// Path of one sweep parameter
///
/// Built by joining every component name from the specification root down to
/// the `param` leaf with `.`.
///
/// # Examples
/// - `["a", "param"]` → `a.param`
/// - `["b", "c", "param"]` → `b.c.param`
///
/// Equality and ordering are defined on the dotted string, so a sorted
/// collection of paths is ordered exactly as their rendered forms.
#[derive(Debug, Clone)]
pub struct ParamPath {
    segments: Vec<String>,
    dotted: String,
}

impl ParamPath {
    /// Create path from segments
    ///
    /// # Errors
    /// Returns error if the path is empty or any segment is not a valid name
    pub fn new(segments: Vec<String>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        let dotted = segments.join(".");
        Ok(Self { segments, dotted })
    }

    /// Create the leaf path for a chain of component names
    ///
    /// Appends the reserved `param` segment; component names themselves may
    /// not be `param`.
    ///
    /// # Errors
    /// Returns error if a component is not a valid name
    pub fn leaf(components: &[String]) -> Result<Self, PathError> {
        for component in components {
            validate_component(component)?;
        }
        let mut segments = components.to_vec();
        segments.push(PARAM_KEY.to_string());
        Self::new(segments)
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Dotted form, e.g. `b.c.param`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.dotted
    }

    /// Substitution name: the dotted form with every `.` replaced by `_`
    #[must_use]
    pub fn placeholder(&self) -> String {
        self.dotted.replace('.', "_")
    }

    /// Wildcard segment, e.g. `b.c.param_{b_c_param}`
    #[must_use]
    pub fn wildcard_segment(&self) -> String {
        format!("{}{}{{{}}}", self.dotted, VALUE_SEPARATOR, self.placeholder())
    }

    /// Concrete segment for a rendered value, e.g. `b.c.param_2`
    #[must_use]
    pub fn concrete_segment(&self, value: &str) -> String {
        format!("{}{}{}", self.dotted, VALUE_SEPARATOR, value)
    }

    /// Recover the rendered value from a concrete segment
    ///
    /// Returns `None` if the segment does not start with `<dotted>_`.
    #[must_use]
    pub fn value_in_segment<'a>(&self, segment: &'a str) -> Option<&'a str> {
        segment
            .strip_prefix(self.dotted.as_str())?
            .strip_prefix(VALUE_SEPARATOR)
    }
}

/// Check a specification component name
///
/// # Errors
/// Returns error if the name is empty, reserved, or contains a character
/// that would break path or template rendering
pub fn validate_component(name: &str) -> Result<(), PathError> {
    if name == PARAM_KEY {
        return Err(PathError::ReservedComponent);
    }
    if name.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if name.contains(['/', '\\', '{', '}']) {
        return Err(PathError::InvalidSegment(name.to_string()));
    }
    Ok(())
}

fn validate_segment(segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        Err(PathError::EmptySegment)
    } else if segment.contains(['/', '\\', '{', '}']) {
        Err(PathError::InvalidSegment(segment.to_string()))
    } else {
        Ok(())
    }
}

impl PartialEq for ParamPath {
    fn eq(&self, other: &Self) -> bool {
        self.dotted == other.dotted
    }
}

impl Eq for ParamPath {}

impl PartialOrd for ParamPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dotted.cmp(&other.dotted)
    }
}

impl Hash for ParamPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dotted.hash(state);
    }
}

impl Display for ParamPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted)
    }
}

impl FromStr for ParamPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        Self::new(s.split('.').map(str::to_string).collect())
    }
}

impl AsRef<str> for ParamPath {
    fn as_ref(&self) -> &str {
        &self.dotted
    }
}

/// Errors related to parameter paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path has no segments
    #[error("parameter path is empty")]
    Empty,

    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Segment contains a path separator or brace
    #[error("invalid segment: {0} (must not contain '/', '\\', '{{' or '}}')")]
    InvalidSegment(String),

    /// Component named like the reserved leaf key
    #[error("'{PARAM_KEY}' is reserved for parameter leaves")]
    ReservedComponent,
}
