//! Parameter assignments and their path encoding
//!
//! An [`Assignment`] is one point of the sweep: a rendered value for every
//! parameter, in [`ParamSet`] order. It encodes to a concrete output path and
//! decodes back from one; values stay text in both directions.

use crate::error::PathMismatch;
use crate::flatten::ParamSet;
use crate::path::ParamPath;
use std::path::{Component, Path, PathBuf};

/// Rendered value for every parameter of one combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pairs: Vec<(ParamPath, String)>,
}

impl Assignment {
    pub(crate) fn from_sorted(pairs: Vec<(ParamPath, String)>) -> Self {
        debug_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
        Self { pairs }
    }

    /// Decode the trailing segments of a concrete output path
    ///
    /// The last `params.len()` components of `path` must be
    /// `<dotted_path>_<value>` for each parameter, in order. Leading
    /// components (the base directory) are not inspected.
    ///
    /// # Errors
    /// Returns [`PathMismatch`] if the path has too few components, a
    /// component is not UTF-8, or a component does not carry the expected
    /// parameter prefix
    pub fn from_output_path(params: &ParamSet, path: &Path) -> Result<Self, PathMismatch> {
        let display = path.display().to_string();
        let components: Vec<&str> = path
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment),
                _ => None,
            })
            .map(|segment| {
                segment.to_str().ok_or_else(|| PathMismatch::NonUtf8 {
                    path: display.clone(),
                })
            })
            .collect::<Result<_, _>>()?;

        let expected = params.len();
        if components.len() < expected {
            return Err(PathMismatch::TooFewSegments {
                path: display,
                expected,
                found: components.len(),
            });
        }

        let tail = &components[components.len() - expected..];
        let pairs = params
            .paths()
            .zip(tail)
            .map(|(param, segment)| {
                param
                    .value_in_segment(segment)
                    .map(|value| (param.clone(), value.to_string()))
                    .ok_or_else(|| PathMismatch::UnexpectedSegment {
                        path: display.clone(),
                        param: param.to_string(),
                        segment: (*segment).to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { pairs })
    }

    /// Number of assigned parameters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no parameters are assigned
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate `(path, value)` in ascending path order
    pub fn iter(&self) -> impl Iterator<Item = (&ParamPath, &str)> {
        self.pairs.iter().map(|(path, value)| (path, value.as_str()))
    }

    /// Value assigned to the parameter with the given dotted path
    #[must_use]
    pub fn get(&self, dotted: &str) -> Option<&str> {
        self.iter()
            .find(|(path, _)| path.as_str() == dotted)
            .map(|(_, value)| value)
    }

    /// Concrete output path under `base`
    #[must_use]
    pub fn to_path(&self, base: impl AsRef<Path>) -> PathBuf {
        self.pairs
            .iter()
            .fold(base.as_ref().to_path_buf(), |acc, (path, value)| {
                acc.join(path.concrete_segment(value))
            })
    }

    /// `<dotted_path>=<value>` strings, one per parameter
    pub fn config_args(&self) -> impl Iterator<Item = String> + '_ {
        self.pairs
            .iter()
            .map(|(path, value)| format!("{path}={value}"))
    }
}
