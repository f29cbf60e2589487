//! Rule: text_field
//!
//! Converts a legacy text-field widget to the granite form text field.
//!
//! ```yaml
//! # Before
//! name: title
//! node_type: cq:Widget
//! properties: {xtype: textfield, name: "./title", fieldLabel: Title}
//!
//! # After
//! name: title
//! node_type: granite/ui/components/foundation/form/textfield
//! properties: {name: "./title", fieldLabel: Title}
//! ```

use treewrite_core::{Node, RewriteRule, RuleError};

pub const LEGACY_WIDGET_TYPE: &str = "cq:Widget";
pub const GRANITE_TEXT_FIELD_TYPE: &str = "granite/ui/components/foundation/form/textfield";

pub struct TextFieldRule {
    ranking: Option<i32>,
}

impl TextFieldRule {
    pub fn new() -> Self {
        Self { ranking: None }
    }

    /// Priority is supplied externally at registration time
    pub fn with_ranking(ranking: i32) -> Self {
        Self {
            ranking: Some(ranking),
        }
    }
}

impl Default for TextFieldRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for TextFieldRule {
    fn name(&self) -> &str {
        "text_field"
    }

    fn matches(&self, node: &Node) -> bool {
        node.node_type() == LEGACY_WIDGET_TYPE && node.string("xtype") == Some("textfield")
    }

    fn apply(&self, node: &Node) -> Result<Option<Node>, RuleError> {
        // A form field without a submit name is malformed legacy content.
        let field_name = node.string("name").ok_or_else(|| RuleError::MissingProperty {
            property: "name".to_string(),
        })?;

        let mut result = Node::new(node.name(), GRANITE_TEXT_FIELD_TYPE);
        result.set("name", field_name);
        if let Some(label) = node.string("fieldLabel") {
            result.set("fieldLabel", label);
        }
        if let Some(default) = node.string("defaultValue") {
            result.set("value", default);
        }
        if let Some(allow_blank) = node.flag("allowBlank") {
            result.set("required", !allow_blank);
        }
        Ok(Some(result))
    }

    fn ranking(&self) -> Option<i32> {
        self.ranking
    }
}
