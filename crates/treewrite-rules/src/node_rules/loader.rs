//! Parses a rule-definition content node into a `RuleSpec`
//!
//! A malformed definition fails to load with a `DefinitionError`; the
//! registry skips it and keeps loading its siblings.

use thiserror::Error;
use treewrite_core::{Node, PropertyValue};

use super::schema::{
    Expectation, MatchSpec, PropertyPredicate, ReplacementSpec, RuleSpec, DROP_PROP,
    FORBIDDEN_CHILDREN_PROP, KEEP_CHILDREN_PROP, MATCH_CHILD, NODE_TYPE_PROP, NON_EMPTY_PATTERN,
    RANKING_PROP, RENAME_PROP, REPLACEMENT_CHILD, REQUIRED_CHILDREN_PROP, RETYPE_PROP,
};

/// Errors raised for a single malformed rule definition
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Rule definition '{rule}' has no 'match' child")]
    MissingMatch { rule: String },

    #[error("Rule definition '{rule}': property '{property}' must be {expected}")]
    InvalidProperty {
        rule: String,
        property: String,
        expected: &'static str,
    },
}

/// Parse one rule definition; `position` is its 0-based discovery index,
/// used as the default priority when no `ranking` property is present
pub fn parse_rule(node: &Node, position: usize) -> Result<RuleSpec, DefinitionError> {
    let name = node.name().to_string();

    let ranking = match node.get(RANKING_PROP) {
        None => i32::try_from(position).unwrap_or(i32::MAX),
        Some(PropertyValue::Long(r)) if *r >= 0 => i32::try_from(*r).unwrap_or(i32::MAX),
        Some(PropertyValue::Long(_)) => i32::MAX,
        Some(_) => {
            return Err(DefinitionError::InvalidProperty {
                rule: name,
                property: RANKING_PROP.to_string(),
                expected: "an integer",
            })
        }
    };

    let match_node = node
        .child(MATCH_CHILD)
        .ok_or_else(|| DefinitionError::MissingMatch { rule: name.clone() })?;
    let matcher = parse_match(&name, match_node)?;

    let replacement = node
        .child(REPLACEMENT_CHILD)
        .map(|n| parse_replacement(&name, n))
        .transpose()?;

    Ok(RuleSpec {
        name,
        ranking,
        matcher,
        replacement,
    })
}

fn parse_match(rule: &str, node: &Node) -> Result<MatchSpec, DefinitionError> {
    let mut spec = MatchSpec {
        node_type: optional_string(rule, node, NODE_TYPE_PROP)?,
        required_children: optional_string_list(rule, node, REQUIRED_CHILDREN_PROP)?,
        forbidden_children: optional_string_list(rule, node, FORBIDDEN_CHILDREN_PROP)?,
        properties: Vec::new(),
    };

    for (prop, value) in node.properties() {
        if matches!(
            prop,
            NODE_TYPE_PROP | REQUIRED_CHILDREN_PROP | FORBIDDEN_CHILDREN_PROP
        ) {
            continue;
        }
        let expectation = match value.as_str() {
            Some(NON_EMPTY_PATTERN) => Expectation::NonEmpty,
            _ => Expectation::Equals(value.clone()),
        };
        spec.properties.push(PropertyPredicate {
            name: prop.to_string(),
            expectation,
        });
    }

    Ok(spec)
}

fn parse_replacement(rule: &str, node: &Node) -> Result<ReplacementSpec, DefinitionError> {
    let mut spec = ReplacementSpec {
        rename: optional_string(rule, node, RENAME_PROP)?,
        retype: optional_string(rule, node, RETYPE_PROP)?,
        drop: optional_string_list(rule, node, DROP_PROP)?,
        keep_children: optional_flag(rule, node, KEEP_CHILDREN_PROP)?.unwrap_or(true),
        set: Vec::new(),
        children: node.children().to_vec(),
    };

    for (prop, value) in node.properties() {
        if matches!(prop, RENAME_PROP | RETYPE_PROP | DROP_PROP | KEEP_CHILDREN_PROP) {
            continue;
        }
        spec.set.push((prop.to_string(), value.clone()));
    }

    Ok(spec)
}

fn optional_string(rule: &str, node: &Node, prop: &str) -> Result<Option<String>, DefinitionError> {
    match node.get(prop) {
        None => Ok(None),
        Some(PropertyValue::Str(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DefinitionError::InvalidProperty {
            rule: rule.to_string(),
            property: prop.to_string(),
            expected: "a string",
        }),
    }
}

fn optional_string_list(
    rule: &str,
    node: &Node,
    prop: &str,
) -> Result<Vec<String>, DefinitionError> {
    match node.get(prop) {
        None => Ok(Vec::new()),
        Some(PropertyValue::StrList(l)) => Ok(l.clone()),
        // A single string is accepted as a one-element list.
        Some(PropertyValue::Str(s)) => Ok(vec![s.clone()]),
        Some(_) => Err(DefinitionError::InvalidProperty {
            rule: rule.to_string(),
            property: prop.to_string(),
            expected: "a string list",
        }),
    }
}

fn optional_flag(rule: &str, node: &Node, prop: &str) -> Result<Option<bool>, DefinitionError> {
    match node.get(prop) {
        None => Ok(None),
        Some(PropertyValue::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(DefinitionError::InvalidProperty {
            rule: rule.to_string(),
            property: prop.to_string(),
            expected: "a boolean",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treewrite_core::Node;

    fn definition(yaml: &str) -> Node {
        Node::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_parse_minimal_rule() {
        let node = definition(
            r#"
name: drop_legacy
node_type: nt:unstructured
children:
  - name: match
    node_type: nt:unstructured
    properties:
      nodeType: cq:Widget
      xtype: hidden
"#,
        );
        let spec = parse_rule(&node, 3).unwrap();
        assert_eq!(spec.name, "drop_legacy");
        assert_eq!(spec.ranking, 3);
        assert_eq!(spec.matcher.node_type.as_deref(), Some("cq:Widget"));
        assert_eq!(spec.matcher.properties.len(), 1);
        assert!(spec.replacement.is_none());
    }

    #[test]
    fn test_parse_full_rule() {
        let node = definition(
            r#"
name: retitle
node_type: nt:unstructured
properties:
  ranking: 10
children:
  - name: match
    node_type: nt:unstructured
    properties:
      nodeType: cq:Dialog
      title: "*"
      requiredChildren: [items]
      forbiddenChildren: [layout]
  - name: replacement
    node_type: nt:unstructured
    properties:
      rename: cq:dialog
      retype: nt:unstructured
      drop: [helpPath]
      jcr:title: "${./title}"
      keepChildren: false
    children:
      - name: content
        node_type: nt:unstructured
"#,
        );
        let spec = parse_rule(&node, 0).unwrap();
        assert_eq!(spec.ranking, 10);
        assert!(matches!(
            spec.matcher.properties.as_slice(),
            [PropertyPredicate {
                expectation: Expectation::NonEmpty,
                ..
            }]
        ));
        assert_eq!(spec.matcher.required_children, vec!["items".to_string()]);
        assert_eq!(spec.matcher.forbidden_children, vec!["layout".to_string()]);

        let replacement = spec.replacement.unwrap();
        assert_eq!(replacement.rename.as_deref(), Some("cq:dialog"));
        assert_eq!(replacement.retype.as_deref(), Some("nt:unstructured"));
        assert_eq!(replacement.drop, vec!["helpPath".to_string()]);
        assert!(!replacement.keep_children);
        assert_eq!(replacement.set.len(), 1);
        assert_eq!(replacement.children.len(), 1);
    }

    #[test]
    fn test_missing_match_child() {
        let node = definition("{name: broken, node_type: nt:unstructured}");
        assert!(matches!(
            parse_rule(&node, 0),
            Err(DefinitionError::MissingMatch { rule }) if rule == "broken"
        ));
    }

    #[test]
    fn test_invalid_ranking_type() {
        let node = definition(
            r#"
name: broken
node_type: nt:unstructured
properties:
  ranking: soon
children:
  - name: match
    node_type: nt:unstructured
"#,
        );
        assert!(matches!(
            parse_rule(&node, 0),
            Err(DefinitionError::InvalidProperty { property, .. }) if property == "ranking"
        ));
    }

    #[test]
    fn test_negative_ranking_coerced_to_lowest() {
        let node = definition(
            r#"
name: unranked
node_type: nt:unstructured
properties:
  ranking: -1
children:
  - name: match
    node_type: nt:unstructured
"#,
        );
        assert_eq!(parse_rule(&node, 0).unwrap().ranking, i32::MAX);
    }
}
