//! `RewriteRule` implementation over a parsed rule specification

use treewrite_core::{Node, RewriteRule, RuleError};

use super::applier;
use super::loader::{parse_rule, DefinitionError};
use super::matcher;
use super::schema::RuleSpec;

/// A rule authored as content rather than code
///
/// Constructed per conversion request from a definition subtree; its lifetime
/// is scoped to that request. With no replacement template the rule deletes
/// matched nodes.
pub struct DeclarativeRule {
    spec: RuleSpec,
}

impl DeclarativeRule {
    pub fn new(spec: RuleSpec) -> Self {
        Self { spec }
    }

    /// Parse a definition node; `position` is the discovery index used as
    /// the default priority
    pub fn from_node(node: &Node, position: usize) -> Result<Self, DefinitionError> {
        Ok(Self::new(parse_rule(node, position)?))
    }

    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }
}

impl RewriteRule for DeclarativeRule {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn matches(&self, node: &Node) -> bool {
        matcher::matches(&self.spec.matcher, node)
    }

    fn apply(&self, node: &Node) -> Result<Option<Node>, RuleError> {
        match &self.spec.replacement {
            Some(replacement) => applier::apply(replacement, node).map(Some),
            None => Ok(None),
        }
    }

    fn ranking(&self) -> Option<i32> {
        Some(self.spec.ranking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_from_yaml(yaml: &str, position: usize) -> DeclarativeRule {
        let node = Node::from_yaml(yaml).unwrap();
        DeclarativeRule::from_node(&node, position).unwrap()
    }

    #[test]
    fn test_match_and_rename() {
        let rule = rule_from_yaml(
            r#"
name: rename_foo
node_type: nt:unstructured
children:
  - name: match
    node_type: nt:unstructured
    properties:
      nodeType: foo
  - name: replacement
    node_type: nt:unstructured
    properties:
      rename: bar
"#,
            0,
        );
        let input = Node::new("x", "foo").with("keep", "value");
        assert!(rule.matches(&input));

        let result = rule.apply(&input).unwrap().unwrap();
        assert_eq!(result.name(), "bar");
        assert_eq!(result.node_type(), "foo");
        assert_eq!(result.string("keep"), Some("value"));

        assert!(!rule.matches(&Node::new("x", "other")));
    }

    #[test]
    fn test_no_replacement_deletes_node() {
        let rule = rule_from_yaml(
            r#"
name: drop_foo
node_type: nt:unstructured
children:
  - name: match
    node_type: nt:unstructured
    properties:
      nodeType: foo
"#,
            0,
        );
        assert!(rule.apply(&Node::new("x", "foo")).unwrap().is_none());
    }

    #[test]
    fn test_ranking_defaults_to_position() {
        let yaml = r#"
name: positional
node_type: nt:unstructured
children:
  - name: match
    node_type: nt:unstructured
"#;
        assert_eq!(rule_from_yaml(yaml, 7).ranking(), Some(7));
    }
}
