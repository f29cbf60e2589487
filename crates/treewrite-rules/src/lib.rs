//! treewrite-rules: rule registry, node-defined rules, and built-in
//! code-defined conversion rules
//!
//! Available built-in rules:
//! - text_field: legacy textfield widget to granite form textfield
//! - select: legacy selection widget to granite form select

pub mod node_rules;
pub mod registry;
pub mod select;
pub mod text_field;

pub use node_rules::{DeclarativeRule, DefinitionError};
pub use registry::{RuleRegistry, DEFAULT_RULES_PATH};
pub use select::SelectRule;
pub use text_field::TextFieldRule;
