//! Replacement-template execution for declarative rules
//!
//! The result starts as a shallow copy of the matched node, so a template
//! that only renames preserves type and properties. String template values
//! may reference matched-node properties with the `${./prop}` placeholder
//! syntax.

use regex::Regex;
use std::sync::OnceLock;
use treewrite_core::{Node, PropertyValue, RuleError};

use super::schema::ReplacementSpec;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{\./([^}]+)\}").unwrap())
}

fn display_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Str(s) => s.clone(),
        PropertyValue::Long(n) => n.to_string(),
        PropertyValue::Bool(b) => b.to_string(),
        PropertyValue::StrList(l) => l.join(","),
    }
}

/// Substitute placeholders in a string; `None` if any reference is absent
/// on the matched node
fn substitute_string(template: &str, matched: &Node) -> Option<String> {
    let regex = placeholder_regex();
    let mut unresolved = false;
    let result = regex.replace_all(template, |caps: &regex::Captures| {
        match matched.get(&caps[1]) {
            Some(value) => display_value(value),
            None => {
                unresolved = true;
                String::new()
            }
        }
    });
    if unresolved {
        None
    } else {
        Some(result.into_owned())
    }
}

/// Substitute a template property value; a value consisting of a single
/// placeholder copies the matched property with its type preserved
fn substitute_value(template: &PropertyValue, matched: &Node) -> Option<PropertyValue> {
    let text = match template {
        PropertyValue::Str(s) => s,
        other => return Some(other.clone()),
    };
    if let Some(caps) = placeholder_regex().captures(text) {
        if caps.get(0).map(|m| m.as_str()) == Some(text.as_str()) {
            return matched.get(&caps[1]).cloned();
        }
    }
    substitute_string(text, matched).map(PropertyValue::Str)
}

/// Substitution for structural targets (name, type), where an unresolved
/// reference is a rule-application failure rather than an omission
fn substitute_required(template: &str, matched: &Node) -> Result<String, RuleError> {
    substitute_string(template, matched).ok_or_else(|| {
        let property = placeholder_regex()
            .captures(template)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        RuleError::MissingProperty { property }
    })
}

/// Execute a replacement template against the matched node
pub fn apply(spec: &ReplacementSpec, matched: &Node) -> Result<Node, RuleError> {
    let mut result = matched.shallow_clone();

    if spec.keep_children {
        for child in matched.children() {
            result
                .add_child(child.clone())
                .map_err(|e| RuleError::Malformed(e.to_string()))?;
        }
    }

    if let Some(rename) = &spec.rename {
        result.set_name(substitute_required(rename, matched)?);
    }
    if let Some(retype) = &spec.retype {
        result.set_node_type(substitute_required(retype, matched)?);
    }

    for property in &spec.drop {
        result.remove(property);
    }

    for (property, template) in &spec.set {
        match substitute_value(template, matched) {
            Some(value) => result.set(property.clone(), value),
            // Unresolved reference: the target property is omitted.
            None => {
                result.remove(property);
            }
        }
    }

    for template in &spec.children {
        result.set_child(instantiate(template, matched));
    }

    Ok(result)
}

/// Build a template child, applying substitution to its properties
/// recursively; unresolved references omit the property
fn instantiate(template: &Node, matched: &Node) -> Node {
    let mut node = Node::new(template.name(), template.node_type());
    for (property, value) in template.properties() {
        if let Some(value) = substitute_value(value, matched) {
            node.set(property, value);
        }
    }
    for child in template.children() {
        node.set_child(instantiate(child, matched));
    }
    node
}
