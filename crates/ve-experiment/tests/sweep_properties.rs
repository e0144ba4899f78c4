use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use serde_json::{json, Value};
use std::path::Component;
use ve_experiment::{ParamSet, ParamSpec, ParamValue, SpecNode, ValueSet, VeExperiment};

fn value() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        (-50i64..50).prop_map(ParamValue::Int),
        prop_oneof![-1e3f64..1e3, Just(1e16), Just(1e-5), Just(2.0)].prop_map(ParamValue::Float),
        any::<bool>().prop_map(ParamValue::Bool),
        "[a-z_]{0,4}".prop_map(ParamValue::Str),
    ]
}

/// Value sets with distinct renderings, at most two entries
fn values() -> impl Strategy<Value = ValueSet> {
    prop::collection::vec(value(), 0..3).prop_map(|candidates| {
        let mut seen = BTreeSet::new();
        candidates
            .into_iter()
            .filter(|v| seen.insert(v.render()))
            .collect::<ValueSet>()
    })
}

fn node() -> impl Strategy<Value = SpecNode> {
    values()
        .prop_map(SpecNode::Leaf)
        .prop_recursive(3, 6, 2, |inner| {
            prop::collection::btree_map("[a-e]{1,2}", inner, 1..3).prop_map(SpecNode::Group)
        })
}

fn arb_spec() -> impl Strategy<Value = ParamSpec> {
    prop::collection::btree_map("[a-e]{1,3}", node(), 0..4)
        .prop_map(|root: BTreeMap<String, SpecNode>| ParamSpec::from_root(SpecNode::Group(root)))
        .prop_filter("sweep too large to enumerate", |spec| {
            ParamSet::flatten(spec)
                .ok()
                .and_then(|params| params.combination_count())
                .is_some_and(|count| count <= 1024)
        })
}

fn scalar_json(value: &ParamValue) -> Value {
    match value {
        ParamValue::Bool(b) => Value::from(*b),
        ParamValue::Int(i) => Value::from(*i),
        ParamValue::Float(x) => Value::from(*x),
        ParamValue::Str(s) => Value::from(s.as_str()),
    }
}

/// Document form of a node, writing one-element sets as bare scalars
fn node_json(node: &SpecNode) -> Value {
    match node {
        SpecNode::Leaf(values) if values.len() == 1 => {
            json!({ "param": values.iter().map(scalar_json).next() })
        }
        SpecNode::Leaf(values) => {
            json!({ "param": values.iter().map(scalar_json).collect::<Vec<_>>() })
        }
        SpecNode::Group(children) => Value::Object(
            children
                .iter()
                .map(|(name, child)| (name.clone(), node_json(child)))
                .collect(),
        ),
    }
}

fn segments(path: &std::path::Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_flatten_is_idempotent(spec in arb_spec()) {
        let first = ParamSet::flatten(&spec).unwrap();
        let second = ParamSet::flatten(&spec).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_document_form_parses_back(spec in arb_spec()) {
        let parsed = ParamSpec::from_json(&node_json(spec.root())).unwrap();
        prop_assert_eq!(parsed, spec);
    }

    #[test]
    fn prop_output_count_is_product(spec in arb_spec()) {
        let exp = VeExperiment::new("out", spec).unwrap();
        let product: usize = exp.params().iter().map(|(_, values)| values.len()).product();
        prop_assert_eq!(exp.all_outputs().len(), product);
        prop_assert_eq!(exp.combination_count(), Some(product));
    }

    #[test]
    fn prop_outputs_are_distinct(spec in arb_spec()) {
        let exp = VeExperiment::new("out", spec).unwrap();
        let outputs = exp.all_outputs();
        let unique: BTreeSet<_> = outputs.iter().collect();
        prop_assert_eq!(unique.len(), outputs.len());
    }

    #[test]
    fn prop_wildcards_are_sorted_placeholders(spec in arb_spec()) {
        let exp = VeExperiment::new("out", spec).unwrap();
        prop_assert_eq!(exp.outpath(), exp.output());

        let segs = segments(&exp.outpath());
        prop_assert_eq!(segs.len(), exp.params().len() + 1);

        let dotted: Vec<&str> = exp.params().paths().map(|p| p.as_str()).collect();
        let mut sorted = dotted.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&dotted, &sorted);

        for (segment, path) in segs[1..].iter().zip(&dotted) {
            let expected = format!("{}_{{{}}}", path, path.replace('.', "_"));
            prop_assert_eq!(segment, &expected);
        }
    }

    #[test]
    fn prop_outputs_round_trip(spec in arb_spec()) {
        let exp = VeExperiment::new("out", spec).unwrap();
        for output in exp.all_outputs() {
            let assignment = exp.parse_output(&output).unwrap();
            prop_assert_eq!(exp.output_for(&assignment), output.clone());

            let invocation = exp.invocation(&["dataset"], &[&output]).unwrap();
            let args = invocation.args_lossy();
            prop_assert_eq!(args.len(), 3 + 2 * exp.params().len());
            prop_assert_eq!(args.last().map(String::as_str), Some("dataset"));
        }
    }
}
