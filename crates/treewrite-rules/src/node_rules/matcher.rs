//! Conjunctive predicate evaluation for declarative rules

use treewrite_core::Node;

use super::schema::{Expectation, MatchSpec};

/// Evaluate all predicates against a candidate node; every predicate must
/// hold. A predicate naming a property absent on the candidate is false,
/// never an error.
pub fn matches(spec: &MatchSpec, node: &Node) -> bool {
    if let Some(node_type) = &spec.node_type {
        if node.node_type() != node_type {
            return false;
        }
    }

    for predicate in &spec.properties {
        let value = match node.get(&predicate.name) {
            Some(value) => value,
            None => return false,
        };
        let holds = match &predicate.expectation {
            Expectation::Equals(expected) => value == expected,
            Expectation::NonEmpty => !value.is_empty(),
        };
        if !holds {
            return false;
        }
    }

    spec.required_children.iter().all(|name| node.has_child(name))
        && !spec.forbidden_children.iter().any(|name| node.has_child(name))
}
