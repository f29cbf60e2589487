//! Rewrite rule abstraction
//!
//! A rule is a match predicate plus a transformation applied to a single
//! node during rewriting. Rules are tried in ranking order (lower = first);
//! a rule with no ranking, or a negative one, sorts last.

use crate::node::Node;
use thiserror::Error;

/// Error raised by a rule failing to apply to a matched node
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Missing expected property '{property}'")]
    MissingProperty { property: String },

    #[error("Malformed source node: {0}")]
    Malformed(String),
}

/// A match+transform unit applied to one node at a time
///
/// `matches` must not mutate the node; it sees the tree as already rewritten
/// above it, but untouched below. `apply` returns the replacement subtree for
/// the matched position, or `None` to delete the node and its subtree. The
/// engine applies at most one rule per original position and never re-matches
/// a replacement at the position it was produced for, so a rule whose output
/// would satisfy its own predicate is still applied exactly once.
pub trait RewriteRule: Send + Sync {
    /// Identifier used in logs and error messages
    fn name(&self) -> &str;

    fn matches(&self, node: &Node) -> bool;

    fn apply(&self, node: &Node) -> Result<Option<Node>, RuleError>;

    /// Priority: lower values are tried first. `None` means unranked.
    fn ranking(&self) -> Option<i32> {
        None
    }
}

/// Ranking with the unranked/negative sentinel coerced to lowest priority
pub fn effective_ranking(rule: &dyn RewriteRule) -> i32 {
    match rule.ranking() {
        Some(r) if r >= 0 => r,
        _ => i32::MAX,
    }
}
