//! Rule: select
//!
//! Converts a legacy selection widget to the granite form select. Legacy
//! option nodes live under an `options` collection child; the granite shape
//! keeps them under `items`, one node per option with `text`/`value`.

use treewrite_core::{Node, RewriteRule, RuleError};

use crate::text_field::LEGACY_WIDGET_TYPE;

pub const GRANITE_SELECT_TYPE: &str = "granite/ui/components/foundation/form/select";

pub struct SelectRule {
    ranking: Option<i32>,
}

impl SelectRule {
    pub fn new() -> Self {
        Self { ranking: None }
    }

    pub fn with_ranking(ranking: i32) -> Self {
        Self {
            ranking: Some(ranking),
        }
    }
}

impl Default for SelectRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for SelectRule {
    fn name(&self) -> &str {
        "select"
    }

    fn matches(&self, node: &Node) -> bool {
        node.node_type() == LEGACY_WIDGET_TYPE && node.string("xtype") == Some("selection")
    }

    fn apply(&self, node: &Node) -> Result<Option<Node>, RuleError> {
        let field_name = node.string("name").ok_or_else(|| RuleError::MissingProperty {
            property: "name".to_string(),
        })?;

        let mut result = Node::new(node.name(), GRANITE_SELECT_TYPE);
        result.set("name", field_name);
        if let Some(label) = node.string("fieldLabel") {
            result.set("fieldLabel", label);
        }

        if let Some(options) = node.child("options") {
            let mut items = Node::new("items", "nt:unstructured");
            for option in options.children() {
                let value = option.string("value").ok_or_else(|| {
                    RuleError::Malformed(format!("option '{}' has no value", option.name()))
                })?;
                let mut item = Node::new(option.name(), "nt:unstructured");
                item.set("value", value);
                if let Some(text) = option.string("text") {
                    item.set("text", text);
                }
                items
                    .add_child(item)
                    .map_err(|e| RuleError::Malformed(e.to_string()))?;
            }
            result
                .add_child(items)
                .map_err(|e| RuleError::Malformed(e.to_string()))?;
        }

        Ok(Some(result))
    }

    fn ranking(&self) -> Option<i32> {
        self.ranking
    }
}
