//! Tree data model for dialog-definition content
//!
//! A `Node` is a named, typed tree element with typed properties and ordered,
//! uniquely-named children. Nodes own their subtrees outright; paths are
//! computed by the store, not held on the node.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by tree construction and parsing
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("Duplicate child name '{name}'")]
    DuplicateChild { name: String },

    #[error("Failed to parse tree: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Long(i64),
    Str(String),
    StrList(Vec<String>),
}

impl PropertyValue {
    /// True for the empty string and the empty list. Booleans and numbers
    /// are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Str(s) => s.is_empty(),
            PropertyValue::StrList(l) => l.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            PropertyValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::StrList(l) => Some(l),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Str(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Long(n)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(l: Vec<String>) -> Self {
        PropertyValue::StrList(l)
    }
}

/// A named, typed element of a dialog-definition tree
///
/// Sibling names are unique; `add_child` enforces the invariant, `set_child`
/// replaces an existing same-named child instead. Derived equality compares
/// names, types, properties and children (child order significant), which is
/// exactly structural identity.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Node {
    name: String,
    node_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, PropertyValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn set_node_type(&mut self, node_type: impl Into<String>) {
        self.node_type = node_type.into();
    }

    /// Set a property, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Builder-style property setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_str)
    }

    pub fn long(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(PropertyValue::as_long)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(PropertyValue::as_bool)
    }

    pub fn strings(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(PropertyValue::as_list)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append a child; sibling names must stay unique
    pub fn add_child(&mut self, child: Node) -> Result<(), NodeError> {
        if self.has_child(&child.name) {
            return Err(NodeError::DuplicateChild { name: child.name });
        }
        self.children.push(child);
        Ok(())
    }

    /// Append a child, replacing an existing child with the same name in place
    pub fn set_child(&mut self, child: Node) {
        match self.children.iter_mut().find(|c| c.name == child.name) {
            Some(slot) => *slot = child,
            None => self.children.push(child),
        }
    }

    /// Builder-style child append; panics on a duplicate sibling name, so it
    /// is meant for literal tree construction
    pub fn with_child(mut self, child: Node) -> Self {
        assert!(
            !self.has_child(&child.name),
            "duplicate child name '{}'",
            child.name
        );
        self.children.push(child);
        self
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name == name)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn remove_child(&mut self, name: &str) -> Option<Node> {
        let index = self.children.iter().position(|c| c.name == name)?;
        Some(self.children.remove(index))
    }

    /// Copy of this node without its children
    pub fn shallow_clone(&self) -> Node {
        Node {
            name: self.name.clone(),
            node_type: self.node_type.clone(),
            properties: self.properties.clone(),
            children: Vec::new(),
        }
    }

    /// Parse a tree from YAML, rejecting duplicate sibling names anywhere in
    /// the document
    pub fn from_yaml(yaml: &str) -> Result<Node, NodeError> {
        let node: Node = serde_yaml::from_str(yaml)?;
        node.check_unique_names()?;
        Ok(node)
    }

    pub fn to_yaml(&self) -> Result<String, NodeError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn check_unique_names(&self) -> Result<(), NodeError> {
        for (i, child) in self.children.iter().enumerate() {
            if self.children[..i].iter().any(|c| c.name == child.name) {
                return Err(NodeError::DuplicateChild {
                    name: child.name.clone(),
                });
            }
            child.check_unique_names()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_accessors() {
        let mut node = Node::new("field", "cq:Widget");
        node.set("xtype", "textfield");
        node.set("width", 120i64);
        node.set("required", true);
        node.set("tags", vec!["a".to_string(), "b".to_string()]);

        assert_eq!(node.string("xtype"), Some("textfield"));
        assert_eq!(node.long("width"), Some(120));
        assert_eq!(node.flag("required"), Some(true));
        assert_eq!(node.strings("tags").map(<[String]>::len), Some(2));
        assert_eq!(node.string("width"), None);
        assert!(node.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let mut node = Node::new("items", "cq:WidgetCollection");
        node.add_child(Node::new("title", "cq:Widget")).unwrap();
        let err = node.add_child(Node::new("title", "cq:Widget"));
        assert!(matches!(err, Err(NodeError::DuplicateChild { name }) if name == "title"));
    }

    #[test]
    fn test_set_child_replaces_in_place() {
        let mut node = Node::new("items", "cq:WidgetCollection")
            .with_child(Node::new("a", "t"))
            .with_child(Node::new("b", "t"));
        node.set_child(Node::new("a", "other"));

        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].node_type(), "other");
        assert_eq!(node.children()[1].name(), "b");
    }

    #[test]
    fn test_structural_equality() {
        let a = Node::new("dialog", "cq:Dialog")
            .with("title", "Edit")
            .with_child(Node::new("items", "cq:WidgetCollection"));
        let b = a.clone();
        assert_eq!(a, b);

        let c = b.clone().with("title", "Other");
        assert_ne!(a, c);
    }

    #[test]
    fn test_yaml_round_trip() {
        let yaml = r#"
name: dialog
node_type: cq:Dialog
properties:
  title: Edit component
  width: 480
children:
  - name: items
    node_type: cq:WidgetCollection
    children:
      - name: text
        node_type: cq:Widget
        properties:
          xtype: textfield
"#;
        let node = Node::from_yaml(yaml).unwrap();
        assert_eq!(node.name(), "dialog");
        assert_eq!(node.long("width"), Some(480));
        let text = node.child("items").and_then(|c| c.child("text")).unwrap();
        assert_eq!(text.string("xtype"), Some("textfield"));

        let reparsed = Node::from_yaml(&node.to_yaml().unwrap()).unwrap();
        assert_eq!(node, reparsed);
    }

    #[test]
    fn test_yaml_duplicate_names_rejected() {
        let yaml = r#"
name: dialog
node_type: cq:Dialog
children:
  - name: items
    node_type: t
  - name: items
    node_type: t
"#;
        assert!(matches!(
            Node::from_yaml(yaml),
            Err(NodeError::DuplicateChild { .. })
        ));
    }
}
