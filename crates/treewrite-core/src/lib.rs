//! treewrite-core: Core abstractions for dialog-tree conversion
//!
//! This crate provides:
//! - `Node` / `PropertyValue`: the owned tree data model
//! - `RewriteRule`: trait implemented by code-defined and declarative rules
//! - `TreeRewriter`: the recursive match-and-apply engine
//! - `TreeStore` / `MemoryStore`: the storage collaborator boundary

pub mod node;
pub mod rewriter;
pub mod rule;
pub mod store;

pub use node::{Node, NodeError, PropertyValue};
pub use rewriter::{RewriteError, TreeRewriter, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};
pub use rule::{effective_ranking, RewriteRule, RuleError};
pub use store::{MemoryStore, StoreError, TreeStore};
