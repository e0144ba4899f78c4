//! Cartesian expansion of a parameter set

use crate::assignment::Assignment;
use crate::flatten::ParamSet;
use crate::path::ParamPath;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

/// Lazy iterator over every combination of a [`ParamSet`]
///
/// Yields assignments in odometer order: the last parameter varies fastest.
/// An empty set yields one empty assignment; a set with an empty value
/// sequence yields nothing.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    axes: Vec<(&'a ParamPath, Vec<String>)>,
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Combinations<'a> {
    /// Start iterating the combinations of `params`
    #[must_use]
    pub fn new(params: &'a ParamSet) -> Self {
        let axes: Vec<_> = params
            .iter()
            .map(|(path, values)| (path, values.rendered()))
            .collect();
        let done = axes.iter().any(|(_, values)| values.is_empty());
        Self {
            indices: vec![0; axes.len()],
            axes,
            done,
        }
    }

    fn current(&self) -> Assignment {
        Assignment::from_sorted(
            self.axes
                .iter()
                .zip(&self.indices)
                .map(|((path, values), &i)| ((*path).clone(), values[i].clone()))
                .collect(),
        )
    }

    fn advance(&mut self) {
        for (axis, index) in self.indices.iter_mut().enumerate().rev() {
            *index += 1;
            if *index < self.axes[axis].1.len() {
                return;
            }
            *index = 0;
        }
        self.done = true;
    }
}

impl Iterator for Combinations<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let assignment = self.current();
        self.advance();
        Some(assignment)
    }
}

impl FusedIterator for Combinations<'_> {}

/// Every concrete output path of `params` under `base`
#[must_use]
pub fn expand_outputs(base: impl AsRef<Path>, params: &ParamSet) -> Vec<PathBuf> {
    let base = base.as_ref();
    let outputs: Vec<PathBuf> = Combinations::new(params)
        .map(|assignment| assignment.to_path(base))
        .collect();
    tracing::debug!(
        "Expanded {} parameters into {} outputs",
        params.len(),
        outputs.len()
    );
    outputs
}
