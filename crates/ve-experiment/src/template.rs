//! Output-path templating

use crate::path::ParamPath;
use std::path::{Path, PathBuf};

/// Templated output path with one wildcard segment per parameter
///
/// Segments are emitted in ascending dotted-path order regardless of the
/// order `paths` yields them in. With no parameters the result is `base`.
///
/// ```
/// use std::path::PathBuf;
/// use ve_experiment::{outpath_with_wildcards, ParamPath};
///
/// let paths: Vec<ParamPath> = ["core.param2", "core.param1"]
///     .iter()
///     .map(|p| p.parse().unwrap())
///     .collect();
/// assert_eq!(
///     outpath_with_wildcards("out", &paths),
///     PathBuf::from("out/core.param1_{core_param1}/core.param2_{core_param2}")
/// );
/// ```
#[must_use]
pub fn outpath_with_wildcards<'a, I>(base: impl AsRef<Path>, paths: I) -> PathBuf
where
    I: IntoIterator<Item = &'a ParamPath>,
{
    let mut sorted: Vec<&ParamPath> = paths.into_iter().collect();
    sorted.sort();
    sorted
        .into_iter()
        .fold(base.as_ref().to_path_buf(), |acc, path| {
            acc.join(path.wildcard_segment())
        })
}
