//! Flattening of nested specifications into an ordered parameter set
//!
//! [`ParamSet`] is the single source of parameter order: templating,
//! expansion and output-path parsing all iterate it, so they cannot disagree
//! on which segment belongs to which parameter.

use crate::error::SpecError;
use crate::path::{validate_component, ParamPath};
use crate::spec::{ParamSpec, SpecNode};
use crate::value::ValueSet;
use std::collections::btree_map::{self, BTreeMap};

/// Flattened parameters, ordered by ascending dotted path
///
/// Invariants:
/// - iteration order is byte-wise ascending order of the dotted paths
/// - dotted paths are unique
/// - wildcard placeholders are unique
/// - every rendered value fits in a single path segment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    entries: BTreeMap<ParamPath, ValueSet>,
}

impl ParamSet {
    /// Flatten a specification
    ///
    /// Walks the node tree with an explicit worklist; order of the result
    /// does not depend on traversal order.
    ///
    /// # Errors
    /// Returns [`SpecError`] for empty components, invalid component names,
    /// values that contain a path separator, duplicate dotted paths and
    /// placeholder collisions
    pub fn flatten(spec: &ParamSpec) -> Result<Self, SpecError> {
        let mut set = Self::default();
        let mut placeholders: BTreeMap<String, ParamPath> = BTreeMap::new();
        let mut worklist: Vec<(Vec<String>, &SpecNode)> = vec![(Vec::new(), spec.root())];

        while let Some((chain, node)) = worklist.pop() {
            match node {
                SpecNode::Leaf(values) => {
                    let path = ParamPath::leaf(&chain).map_err(|source| SpecError::InvalidName {
                        parent: chain.join("."),
                        source,
                    })?;
                    check_renderable(&path, values)?;
                    if let Some(first) = placeholders.insert(path.placeholder(), path.clone()) {
                        return Err(if first == path {
                            SpecError::DuplicatePath(path.to_string())
                        } else {
                            SpecError::PlaceholderCollision {
                                first: first.to_string(),
                                second: path.to_string(),
                                placeholder: path.placeholder(),
                            }
                        });
                    }
                    set.entries.insert(path, values.clone());
                }
                SpecNode::Group(children) => {
                    if children.is_empty() && !chain.is_empty() {
                        return Err(SpecError::EmptyComponent {
                            path: chain.join("."),
                        });
                    }
                    for (name, child) in children {
                        validate_component(name).map_err(|source| SpecError::InvalidName {
                            parent: chain.join("."),
                            source,
                        })?;
                        let mut next = chain.clone();
                        next.push(name.clone());
                        worklist.push((next, child));
                    }
                }
            }
        }

        tracing::debug!("Flattened specification into {} parameters", set.len());
        Ok(set)
    }

    /// Number of parameters
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no parameters
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(path, values)` in ascending path order
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, ParamPath, ValueSet> {
        self.entries.iter()
    }

    /// Iterate paths in ascending order
    #[inline]
    pub fn paths(&self) -> btree_map::Keys<'_, ParamPath, ValueSet> {
        self.entries.keys()
    }

    /// Values of the parameter with the given dotted path
    #[must_use]
    pub fn get(&self, dotted: &str) -> Option<&ValueSet> {
        self.entries
            .iter()
            .find(|(path, _)| path.as_str() == dotted)
            .map(|(_, values)| values)
    }

    /// Number of combinations: the product of all value-set lengths
    ///
    /// `1` for an empty set, `0` if any value set is empty, `None` on
    /// overflow.
    #[must_use]
    pub fn combination_count(&self) -> Option<usize> {
        self.entries
            .values()
            .try_fold(1usize, |acc, values| acc.checked_mul(values.len()))
    }
}

impl<'a> IntoIterator for &'a ParamSet {
    type Item = (&'a ParamPath, &'a ValueSet);
    type IntoIter = btree_map::Iter<'a, ParamPath, ValueSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn check_renderable(path: &ParamPath, values: &ValueSet) -> Result<(), SpecError> {
    for value in values {
        let rendered = value.render();
        if rendered.contains(['/', '\\']) {
            return Err(SpecError::UnrenderableValue {
                path: path.to_string(),
                value: rendered,
            });
        }
    }
    Ok(())
}
