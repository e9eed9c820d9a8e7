//! Snapshot extraction from semi-structured profile captures
//!
//! Two entry points share one ordered field-rule table:
//! - `parse_nodes` walks the named nodes of an accessibility-tree snapshot;
//!   later nodes overwrite earlier matches (last match wins).
//! - `parse_markup` applies the same rules to a raw markup blob; the leftmost
//!   valid match per field wins.
//!
//! Extraction is total: a field with no recognizable pattern keeps its
//! default (zero count or unset optional), never an error.
//!
//! ## Module Organization
//!
//! - `fields` - Rule table, keyword scanning, K/M suffix handling
//! - `parser` - Draft assembly into `ProfileSnapshot`, post markup scanning

pub mod fields;
pub mod parser;

pub use fields::{FieldRule, FieldTarget, Matcher, FIELD_RULES};
pub use parser::{
    parse_markup, parse_markup_at, parse_nodes, parse_nodes_at, parse_posts_markup, SnapshotNode,
};
