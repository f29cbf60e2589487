//! treewrite-convert: batch conversion coordinator
//!
//! Drives the rewrite engine over an ordered list of root paths. Each path
//! is processed independently: a nonexistent path or a failed rewrite
//! becomes that path's error outcome and never affects the others, so a
//! batch always completes with exactly one outcome per requested path. Only
//! environment-level storage failures propagate.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use treewrite_core::{StoreError, TreeRewriter, TreeStore};
use treewrite_rules::RuleRegistry;

/// Per-root-path conversion result: the rewritten tree's location or an
/// error message, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConversionOutcome {
    #[serde(rename = "resultPath")]
    Converted(String),
    #[serde(rename = "errorMessage")]
    Failed(String),
}

impl ConversionOutcome {
    pub fn converted(path: impl Into<String>) -> Self {
        ConversionOutcome::Converted(path.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        ConversionOutcome::Failed(message.into())
    }

    pub fn result_path(&self) -> Option<&str> {
        match self {
            ConversionOutcome::Converted(path) => Some(path),
            ConversionOutcome::Failed(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ConversionOutcome::Converted(_) => None,
            ConversionOutcome::Failed(message) => Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Converted(_))
    }
}

/// Drives per-request rule collection and per-path rewriting
pub struct ConversionCoordinator {
    registry: Arc<RuleRegistry>,
}

impl ConversionCoordinator {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    /// Convert each requested root, in caller order
    ///
    /// The rule list is collected once per call (one registry snapshot per
    /// request). The outcome map is keyed by requested path; duplicate
    /// requests collapse onto one key.
    pub fn convert<S: AsRef<str>>(
        &self,
        store: &mut dyn TreeStore,
        paths: &[S],
    ) -> Result<BTreeMap<String, ConversionOutcome>, StoreError> {
        let started = Instant::now();
        let rules = self.registry.collect(&*store)?;
        let rewriter = TreeRewriter::new(rules);
        let mut outcomes = BTreeMap::new();
        debug!("Converting {} trees", paths.len());

        for path in paths {
            let path = path.as_ref();
            if !store.exists(path) {
                debug!("Path {} doesn't exist", path);
                outcomes.insert(path.to_string(), ConversionOutcome::error("Invalid path"));
                continue;
            }

            let root = store.read(path)?;
            let outcome = match rewriter.rewrite(&root) {
                Ok(tree) => match store.write(path, tree) {
                    Ok(result_path) => {
                        debug!("Successfully converted tree {} to {}", path, result_path);
                        ConversionOutcome::converted(result_path)
                    }
                    // A write conflict (e.g. rename collision) fails this
                    // path only.
                    Err(e) => {
                        warn!("Persisting converted tree {} failed: {}", path, e);
                        ConversionOutcome::error(e.to_string())
                    }
                },
                Err(e) => {
                    warn!("Converting tree {} failed: {}", path, e);
                    ConversionOutcome::error(e.to_string())
                }
            };
            outcomes.insert(path.to_string(), outcome);
        }

        debug!("Rewrote {} trees in {:?}", paths.len(), started.elapsed());
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors_are_exclusive() {
        let ok = ConversionOutcome::converted("/a/b");
        assert_eq!(ok.result_path(), Some("/a/b"));
        assert_eq!(ok.error_message(), None);
        assert!(ok.is_success());

        let failed = ConversionOutcome::error("Invalid path");
        assert_eq!(failed.result_path(), None);
        assert_eq!(failed.error_message(), Some("Invalid path"));
        assert!(!failed.is_success());
    }

    #[test]
    fn test_outcome_serialization_shape() {
        let ok = serde_json::to_value(ConversionOutcome::converted("/a/b")).unwrap();
        assert_eq!(ok, serde_json::json!({"resultPath": "/a/b"}));

        let failed = serde_json::to_value(ConversionOutcome::error("boom")).unwrap();
        assert_eq!(failed, serde_json::json!({"errorMessage": "boom"}));
    }
}
