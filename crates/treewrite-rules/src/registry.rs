//! Rule registry: code-defined rule collection plus per-request discovery
//! of node-defined rules
//!
//! Code-defined rules are registered once and shared across requests; the
//! list may be mutated concurrently by registration events, so `collect`
//! takes a copy-on-read snapshot under the lock before building the ordered
//! list. Node-defined rules are re-parsed from the rules path on every
//! collection; callers needing caching add it externally.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use treewrite_core::{effective_ranking, RewriteRule, StoreError, TreeStore};

use crate::node_rules::DeclarativeRule;

/// Default location of node-defined rule definitions
pub const DEFAULT_RULES_PATH: &str = "/etc/treewrite/rules";

pub struct RuleRegistry {
    rules_path: String,
    code_rules: RwLock<Vec<Arc<dyn RewriteRule>>>,
}

impl RuleRegistry {
    pub fn new(rules_path: impl Into<String>) -> Self {
        Self {
            rules_path: rules_path.into(),
            code_rules: RwLock::new(Vec::new()),
        }
    }

    pub fn rules_path(&self) -> &str {
        &self.rules_path
    }

    /// Register a code-defined rule for the registry's lifetime
    pub fn register(&self, rule: Arc<dyn RewriteRule>) {
        self.code_rules.write().push(rule);
    }

    /// Remove a previously registered rule by name; returns whether a rule
    /// was removed
    pub fn deregister(&self, name: &str) -> bool {
        let mut rules = self.code_rules.write();
        let before = rules.len();
        rules.retain(|r| r.name() != name);
        rules.len() != before
    }

    /// Build the ordered rule list for one conversion request
    ///
    /// Code-defined rules come first in registration order, then node-defined
    /// rules in discovery order; duplicate names keep the first occurrence.
    /// The stable sort by effective ranking keeps collection order on ties,
    /// so a code-defined rule wins a full tie by position. A malformed
    /// definition is skipped and its siblings still load; a missing rules
    /// path just means no node-defined rules.
    pub fn collect(&self, store: &dyn TreeStore) -> Result<Vec<Arc<dyn RewriteRule>>, StoreError> {
        let mut rules: Vec<Arc<dyn RewriteRule>> = self.code_rules.read().clone();
        let code_count = rules.len();
        let mut node_count = 0usize;

        if store.exists(&self.rules_path) {
            let container = store.read(&self.rules_path)?;
            for (position, definition) in container.children().iter().enumerate() {
                match DeclarativeRule::from_node(definition, position) {
                    Ok(rule) => {
                        rules.push(Arc::new(rule));
                        node_count += 1;
                    }
                    Err(e) => warn!("Skipping rule definition '{}': {}", definition.name(), e),
                }
            }
        }

        let mut seen = HashSet::new();
        rules.retain(|rule| seen.insert(rule.name().to_string()));
        rules.sort_by_key(|rule| effective_ranking(rule.as_ref()));
        debug!(
            "Collected {} rules ({} code-defined, {} node-defined)",
            rules.len(),
            code_count,
            node_count
        );
        Ok(rules)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_RULES_PATH)
    }
}
