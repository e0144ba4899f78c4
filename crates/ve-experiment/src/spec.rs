//! Nested parameter specifications
//!
//! A specification maps component names either to a leaf mapping holding the
//! reserved `param` key, or to further components:
//!
//! ```yaml
//! a:
//!   param: [0, 1]
//! b:
//!   c:
//!     param: [2, 3]
//! ```
//!
//! [`ParamSpec`] deserializes from any serde format through
//! [`serde_json::Value`]; structural problems are rejected while parsing,
//! naming problems when the specification is flattened.

use crate::error::SpecError;
use crate::path::PARAM_KEY;
use crate::value::{ParamValue, ValueSet};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One node of a parameter specification
#[derive(Debug, Clone, PartialEq)]
pub enum SpecNode {
    /// Mapping holding the `param` key
    Leaf(ValueSet),
    /// Mapping of sub-component names to nodes
    Group(BTreeMap<String, SpecNode>),
}

impl SpecNode {
    /// Empty group
    #[inline]
    #[must_use]
    pub fn group() -> Self {
        Self::Group(BTreeMap::new())
    }
}

/// Parameter specification of one virtual experiment
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct ParamSpec {
    root: SpecNode,
}

impl ParamSpec {
    /// Empty specification
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-built node tree
    #[inline]
    #[must_use]
    pub fn from_root(root: SpecNode) -> Self {
        Self { root }
    }

    /// Root node
    #[inline]
    #[must_use]
    pub fn root(&self) -> &SpecNode {
        &self.root
    }

    /// Check if the specification has no components
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(&self.root, SpecNode::Group(children) if children.is_empty())
    }

    /// Add a parameter under a chain of component names
    ///
    /// Intermediate groups are created as needed.
    ///
    /// # Errors
    /// Returns [`SpecError::MixedLeaf`] if the chain runs through an existing
    /// parameter, or would turn an existing group into one
    pub fn with_param<I, S>(
        mut self,
        components: I,
        values: impl Into<ValueSet>,
    ) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components: Vec<String> = components.into_iter().map(Into::into).collect();
        let mut node = &mut self.root;
        for (depth, component) in components.iter().enumerate() {
            node = match node {
                SpecNode::Group(children) => children
                    .entry(component.clone())
                    .or_insert_with(SpecNode::group),
                SpecNode::Leaf(_) => {
                    return Err(SpecError::MixedLeaf {
                        path: components[..depth].join("."),
                        others: vec![component.clone()],
                    })
                }
            };
        }
        if let SpecNode::Group(children) = node {
            if !children.is_empty() {
                return Err(SpecError::MixedLeaf {
                    path: components.join("."),
                    others: children.keys().cloned().collect(),
                });
            }
        }
        *node = SpecNode::Leaf(values.into());
        Ok(self)
    }

    /// Parse a specification document
    ///
    /// `null` is accepted as the empty specification.
    ///
    /// # Errors
    /// Returns [`SpecError`] if the document does not have the nested
    /// mapping shape or a value is not a scalar
    pub fn from_json(value: &Value) -> Result<Self, SpecError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(Self {
                root: parse_mapping(map, &[])?,
            }),
            other => Err(SpecError::RootNotAMapping {
                found: kind_of(other),
            }),
        }
    }
}

impl Default for ParamSpec {
    fn default() -> Self {
        Self {
            root: SpecNode::group(),
        }
    }
}

impl TryFrom<Value> for ParamSpec {
    type Error = SpecError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

fn parse_mapping(map: &Map<String, Value>, chain: &[String]) -> Result<SpecNode, SpecError> {
    if let Some(values) = map.get(PARAM_KEY) {
        if map.len() > 1 {
            return Err(SpecError::MixedLeaf {
                path: chain.join("."),
                others: map.keys().filter(|k| *k != PARAM_KEY).cloned().collect(),
            });
        }
        let mut leaf_chain = chain.to_vec();
        leaf_chain.push(PARAM_KEY.to_string());
        return parse_values(values, &leaf_chain).map(SpecNode::Leaf);
    }

    let mut children = BTreeMap::new();
    for (name, value) in map {
        let mut child_chain = chain.to_vec();
        child_chain.push(name.clone());
        let Value::Object(child) = value else {
            return Err(SpecError::NotAMapping {
                path: child_chain.join("."),
                found: kind_of(value),
            });
        };
        children.insert(name.clone(), parse_mapping(child, &child_chain)?);
    }
    Ok(SpecNode::Group(children))
}

fn parse_values(value: &Value, chain: &[String]) -> Result<ValueSet, SpecError> {
    let invalid = |found: &Value| SpecError::InvalidValue {
        path: chain.join("."),
        found: found.to_string(),
    };
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| ParamValue::from_json(item).ok_or_else(|| invalid(item)))
            .collect::<Result<Vec<_>, _>>()
            .map(ValueSet::new),
        scalar => ParamValue::from_json(scalar)
            .map(ValueSet::single)
            .ok_or_else(|| invalid(scalar)),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
