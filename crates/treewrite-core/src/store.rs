//! Storage collaborator boundary
//!
//! The engine only needs a node-tree provider/persister: existence checks,
//! whole-tree reads, and a write that is visible as soon as it returns.
//! `MemoryStore` is the in-process implementation used by tests and by
//! callers without a real content repository.

use crate::node::Node;
use thiserror::Error;

/// Environment-level storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No node at path '{path}'")]
    NotFound { path: String },

    #[error("A sibling already exists at path '{path}'")]
    Conflict { path: String },
}

/// Node-tree provider and persister
pub trait TreeStore {
    fn exists(&self, path: &str) -> bool;

    /// Read the whole subtree rooted at `path`
    fn read(&self, path: &str) -> Result<Node, StoreError>;

    /// Persist a rewritten tree in the slot of the original node
    ///
    /// Placement policy: the original node is removed and the rewritten root
    /// is attached under the original's parent, keyed by the rewritten
    /// root's name. A root rename therefore moves the result to a sibling
    /// path; otherwise the content is replaced in place at the same path.
    /// The returned path is the result's location.
    fn write(&mut self, original_path: &str, tree: Node) -> Result<String, StoreError>;
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn join(parent: &str, name: &str) -> String {
    let mut out = String::from("/");
    for segment in segments(parent) {
        out.push_str(segment);
        out.push('/');
    }
    out.push_str(name);
    out
}

/// In-memory tree store over a single unnamed super-root
pub struct MemoryStore {
    root: Node,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: Node::new("", ""),
        }
    }

    /// Attach a tree under `parent_path` (fixture assembly)
    pub fn insert(&mut self, parent_path: &str, node: Node) -> Result<(), StoreError> {
        let name = node.name().to_string();
        let parent = self.resolve_mut(parent_path)?;
        parent.add_child(node).map_err(|_| StoreError::Conflict {
            path: join(parent_path, &name),
        })
    }

    fn resolve(&self, path: &str) -> Option<&Node> {
        let mut current = &self.root;
        for segment in segments(path) {
            current = current.child(segment)?;
        }
        Some(current)
    }

    fn resolve_mut(&mut self, path: &str) -> Result<&mut Node, StoreError> {
        let mut current = &mut self.root;
        for segment in segments(path) {
            current = current.child_mut(segment).ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })?;
        }
        Ok(current)
    }
}

impl TreeStore for MemoryStore {
    fn exists(&self, path: &str) -> bool {
        segments(path).next().is_some() && self.resolve(path).is_some()
    }

    fn read(&self, path: &str) -> Result<Node, StoreError> {
        if segments(path).next().is_none() {
            return Err(StoreError::NotFound {
                path: path.to_string(),
            });
        }
        self.resolve(path)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_string(),
            })
    }

    fn write(&mut self, original_path: &str, tree: Node) -> Result<String, StoreError> {
        let parts: Vec<&str> = segments(original_path).collect();
        let (original_name, parent_parts) = match parts.split_last() {
            Some(split) => split,
            None => {
                return Err(StoreError::NotFound {
                    path: original_path.to_string(),
                })
            }
        };
        let parent_path = format!("/{}", parent_parts.join("/"));
        let result_path = join(&parent_path, tree.name());

        let parent = self.resolve_mut(&parent_path)?;
        if !parent.has_child(original_name) {
            return Err(StoreError::NotFound {
                path: original_path.to_string(),
            });
        }
        // Refuse a colliding rename before touching the original, so a
        // failed write leaves the stored tree intact.
        if tree.name() != *original_name && parent.has_child(tree.name()) {
            return Err(StoreError::Conflict { path: result_path });
        }
        parent.remove_child(original_name);
        parent.add_child(tree).map_err(|_| StoreError::Conflict {
            path: result_path.clone(),
        })?;
        Ok(result_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_dialog() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .insert(
                "/",
                Node::new("apps", "folder").with_child(
                    Node::new("component", "folder")
                        .with_child(Node::new("dialog", "cq:Dialog").with("title", "Edit")),
                ),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_exists_and_read() {
        let store = store_with_dialog();
        assert!(store.exists("/apps/component/dialog"));
        assert!(!store.exists("/apps/component/other"));
        assert!(!store.exists("/"));

        let dialog = store.read("/apps/component/dialog").unwrap();
        assert_eq!(dialog.string("title"), Some("Edit"));
        assert!(matches!(
            store.read("/nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_write_in_place_keeps_path() {
        let mut store = store_with_dialog();
        let rewritten = Node::new("dialog", "nt:unstructured").with("converted", true);
        let path = store.write("/apps/component/dialog", rewritten).unwrap();
        assert_eq!(path, "/apps/component/dialog");

        let read_back = store.read(&path).unwrap();
        assert_eq!(read_back.node_type(), "nt:unstructured");
        assert_eq!(read_back.flag("converted"), Some(true));
    }

    #[test]
    fn test_write_with_renamed_root_moves_to_sibling() {
        let mut store = store_with_dialog();
        let rewritten = Node::new("cq:dialog", "nt:unstructured");
        let path = store.write("/apps/component/dialog", rewritten).unwrap();
        assert_eq!(path, "/apps/component/cq:dialog");
        assert!(!store.exists("/apps/component/dialog"));
        assert!(store.exists("/apps/component/cq:dialog"));
    }

    #[test]
    fn test_write_rename_collision_is_conflict() {
        let mut store = store_with_dialog();
        store
            .insert("/apps/component", Node::new("design_dialog", "cq:Dialog"))
            .unwrap();
        let rewritten = Node::new("design_dialog", "nt:unstructured");
        let err = store.write("/apps/component/dialog", rewritten);
        assert!(matches!(err, Err(StoreError::Conflict { .. })));

        // The failed write must not disturb the stored trees.
        let original = store.read("/apps/component/dialog").unwrap();
        assert_eq!(original.node_type(), "cq:Dialog");
        assert_eq!(original.string("title"), Some("Edit"));
        let sibling = store.read("/apps/component/design_dialog").unwrap();
        assert_eq!(sibling.node_type(), "cq:Dialog");
    }

    #[test]
    fn test_write_missing_original() {
        let mut store = store_with_dialog();
        let err = store.write("/apps/component/other", Node::new("other", "t"));
        assert!(matches!(err, Err(StoreError::NotFound { .. })));
    }
}
