//! Plain-data representation of a parsed rule definition
//!
//! These structs carry everything a declarative rule needs at match/apply
//! time, decoupled from the content tree they were parsed from.

use treewrite_core::{Node, PropertyValue};

/// Child node holding the match predicates
pub const MATCH_CHILD: &str = "match";
/// Child node holding the replacement template
pub const REPLACEMENT_CHILD: &str = "replacement";
/// Explicit priority of the rule definition
pub const RANKING_PROP: &str = "ranking";

/// Reserved match-node properties
pub const NODE_TYPE_PROP: &str = "nodeType";
pub const REQUIRED_CHILDREN_PROP: &str = "requiredChildren";
pub const FORBIDDEN_CHILDREN_PROP: &str = "forbiddenChildren";

/// Reserved replacement-node properties
pub const RENAME_PROP: &str = "rename";
pub const RETYPE_PROP: &str = "retype";
pub const DROP_PROP: &str = "drop";
pub const KEEP_CHILDREN_PROP: &str = "keepChildren";

/// Match-predicate sentinel meaning "present and non-empty"
pub const NON_EMPTY_PATTERN: &str = "*";

/// A fully parsed rule definition
#[derive(Debug, Clone)]
pub struct RuleSpec {
    /// The definition node's name, used as the rule identifier
    pub name: String,
    /// Effective priority: explicit `ranking` (negative coerced to lowest)
    /// or the definition's discovery position when absent
    pub ranking: i32,
    pub matcher: MatchSpec,
    /// `None` means the rule deletes matched nodes
    pub replacement: Option<ReplacementSpec>,
}

/// Conjunctive match predicates
#[derive(Debug, Clone, Default)]
pub struct MatchSpec {
    pub node_type: Option<String>,
    pub properties: Vec<PropertyPredicate>,
    pub required_children: Vec<String>,
    pub forbidden_children: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PropertyPredicate {
    pub name: String,
    pub expectation: Expectation,
}

#[derive(Debug, Clone)]
pub enum Expectation {
    /// Property present with exactly this value
    Equals(PropertyValue),
    /// Property present and non-empty
    NonEmpty,
}

/// Replacement template, executed against a shallow copy of the matched node
#[derive(Debug, Clone)]
pub struct ReplacementSpec {
    /// New node name; `${./prop}` substitutable, unresolved references fail
    pub rename: Option<String>,
    /// New node type; `${./prop}` substitutable, unresolved references fail
    pub retype: Option<String>,
    /// Properties removed from the result
    pub drop: Vec<String>,
    /// Properties set on the result; unresolved `${./prop}` references omit
    /// the target property instead of failing
    pub set: Vec<(String, PropertyValue)>,
    /// Reattach the matched node's children (false prunes them)
    pub keep_children: bool,
    /// Template subtrees appended to the result; a template child replaces a
    /// reattached child of the same name
    pub children: Vec<Node>,
}

impl Default for ReplacementSpec {
    fn default() -> Self {
        Self {
            rename: None,
            retype: None,
            drop: Vec::new(),
            set: Vec::new(),
            keep_children: true,
            children: Vec::new(),
        }
    }
}
