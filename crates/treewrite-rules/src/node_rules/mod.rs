//! Node-defined ("declarative") rewrite rules
//!
//! A rule can be authored as content instead of code: a rule-definition
//! subtree under the registry's well-known rules path is parsed into a
//! `DeclarativeRule` carrying its match and replacement specification as
//! plain data. This makes rules deployable without recompilation and
//! unit-testable without a content repository.
//!
//! # Example rule definition (as a content tree)
//!
//! ```yaml
//! name: textfield_to_granite
//! node_type: nt:unstructured
//! children:
//!   - name: match
//!     node_type: nt:unstructured
//!     properties:
//!       nodeType: cq:Widget
//!       xtype: textfield
//!   - name: replacement
//!     node_type: nt:unstructured
//!     properties:
//!       retype: granite/ui/components/foundation/form/textfield
//!       fieldLabel: "${./fieldLabel}"
//!       drop: [xtype]
//! ```
//!
//! Matching is strictly conjunctive: the node type, every property
//! predicate (exact value, or `"*"` for "present and non-empty"), every
//! required child and the absence of every forbidden child must all hold.
//! The replacement starts from a shallow copy of the matched node and then
//! executes the template: rename, retype, property drops and sets (with
//! `${./prop}` references back to the matched node), child reattachment or
//! pruning, and template children.

pub mod applier;
pub mod interpreter;
pub mod loader;
pub mod matcher;
pub mod schema;

pub use interpreter::DeclarativeRule;
pub use loader::{parse_rule, DefinitionError};
pub use schema::{Expectation, MatchSpec, PropertyPredicate, ReplacementSpec, RuleSpec};
