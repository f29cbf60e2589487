//! Recursive tree rewriter
//!
//! Walks a tree top-down. At each node the first matching rule (in the order
//! the caller supplied) is applied once; the engine then recurses into the
//! replacement's children only, never re-matching the replacement at the
//! position it was produced for. A node with no matching rule is copied
//! through unchanged and its children are processed independently.
//!
//! Termination does not rely on rule authors being careful: recursion depth
//! and total visited nodes are capped, and exceeding either cap aborts the
//! rewrite with `RewriteError::StructuralLimitExceeded`.

use crate::node::{Node, NodeError};
use crate::rule::{RewriteRule, RuleError};
use std::borrow::Cow;
use std::sync::Arc;
use thiserror::Error;

/// Default recursion depth cap
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default cap on nodes visited per rewrite
pub const DEFAULT_MAX_NODES: usize = 100_000;

/// Errors aborting a single root-to-root rewrite
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Rule '{rule}' failed to apply: {source}")]
    Rule {
        rule: String,
        #[source]
        source: RuleError,
    },

    #[error("Rule '{rule}' removed the tree root")]
    RootRemoved { rule: String },

    #[error("Rewrite produced an invalid tree: {0}")]
    Structure(#[from] NodeError),

    #[error("Structural limit exceeded: {0}")]
    StructuralLimitExceeded(String),
}

/// Applies an ordered rule list over owned subtrees
pub struct TreeRewriter {
    rules: Vec<Arc<dyn RewriteRule>>,
    max_depth: usize,
    max_nodes: usize,
}

impl TreeRewriter {
    pub fn new(rules: Vec<Arc<dyn RewriteRule>>) -> Self {
        Self {
            rules,
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }

    pub fn with_limits(mut self, max_depth: usize, max_nodes: usize) -> Self {
        self.max_depth = max_depth;
        self.max_nodes = max_nodes;
        self
    }

    /// Rewrite a tree, producing a new root
    ///
    /// The input is never mutated; on any error no partial result is
    /// returned. A rule deleting the requested root is an error, since a
    /// conversion must produce a tree.
    pub fn rewrite(&self, root: &Node) -> Result<Node, RewriteError> {
        let mut visited = 0usize;
        match self.rewrite_node(root, 0, &mut visited)? {
            Some(result) => Ok(result),
            None => {
                // Only a matching rule can prune; re-find it for the error.
                let rule = self
                    .rules
                    .iter()
                    .find(|r| r.matches(root))
                    .map(|r| r.name().to_string())
                    .unwrap_or_default();
                Err(RewriteError::RootRemoved { rule })
            }
        }
    }

    fn rewrite_node(
        &self,
        node: &Node,
        depth: usize,
        visited: &mut usize,
    ) -> Result<Option<Node>, RewriteError> {
        if depth > self.max_depth {
            return Err(RewriteError::StructuralLimitExceeded(format!(
                "recursion depth over {}",
                self.max_depth
            )));
        }
        *visited += 1;
        if *visited > self.max_nodes {
            return Err(RewriteError::StructuralLimitExceeded(format!(
                "more than {} nodes visited",
                self.max_nodes
            )));
        }

        let produced: Cow<'_, Node> = match self.rules.iter().find(|r| r.matches(node)) {
            Some(rule) => {
                match rule.apply(node).map_err(|source| RewriteError::Rule {
                    rule: rule.name().to_string(),
                    source,
                })? {
                    Some(replacement) => Cow::Owned(replacement),
                    // The rule pruned this node and its subtree.
                    None => return Ok(None),
                }
            }
            None => Cow::Borrowed(node),
        };

        let mut result = produced.shallow_clone();
        for child in produced.children() {
            if let Some(rewritten) = self.rewrite_node(child, depth + 1, visited)? {
                result.add_child(rewritten)?;
            }
        }
        Ok(Some(result))
    }
}
